//! Ownership checks.
//!
//! Every lookup filters by id **and** owner, so a row that exists but belongs
//! to somebody else is indistinguishable from a missing one: both fail with
//! [`EngineError::KeyNotFound`].

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, categories, transactions, users, wallets};

use super::Engine;

/// Generates `find_*` and `require_*` methods for an entity owned by a user.
macro_rules! impl_owned_lookup {
    ($find_fn:ident, $require_fn:ident, $entity:path, $model:path, $user_col:expr, $err_msg:literal) => {
        async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            target_id: Uuid,
        ) -> ResultEngine<Option<$model>> {
            <$entity>::find_by_id(target_id)
                .filter($user_col.eq(user_id))
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            self.$find_fn(db, user_id, target_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        find_owned_wallet,
        require_wallet,
        wallets::Entity,
        wallets::Model,
        wallets::Column::UserId,
        "wallet not exists"
    );

    impl_owned_lookup!(
        find_owned_category,
        require_category,
        categories::Entity,
        categories::Model,
        categories::Column::UserId,
        "category not exists"
    );

    impl_owned_lookup!(
        find_owned_transaction,
        require_transaction,
        transactions::Entity,
        transactions::Model,
        transactions::Column::UserId,
        "transaction not exists"
    );

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Checks an optional category reference.
    pub(super) async fn require_optional_category(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Option<categories::Model>> {
        match category_id {
            Some(id) => self.require_category(db, user_id, id).await.map(Some),
            None => Ok(None),
        }
    }
}
