use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, SqlErr, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    Category, Currency, EngineError, NewUserCmd, ResultEngine, User, Wallet, categories,
    categories::DEFAULT_CATEGORIES,
    users,
    util::{Validator, looks_like_email},
    wallets,
};

use super::{Engine, with_tx};

const DEFAULT_WALLET_NAME: &str = "My Wallet";

impl Engine {
    /// Registers a user.
    ///
    /// The user starts with one empty wallet (`My Wallet`, default currency)
    /// and the default categories. Username and email are unique
    /// (case-insensitive).
    pub async fn new_user(&self, cmd: NewUserCmd) -> ResultEngine<User> {
        let mut validator = Validator::new();
        let username = cmd.username.trim().to_string();
        let email = cmd.email.trim().to_lowercase();
        validator
            .check(
                username.chars().count() >= 3,
                "username must be at least 3 characters",
            )
            .check(looks_like_email(&email), "email must be a valid address")
            .check(!cmd.password_hash.is_empty(), "password is required");
        validator.finish()?;

        with_tx!(self, |db_tx| {
            let username_taken = users::Entity::find()
                .filter(Expr::expr(Expr::cust("LOWER(username)")).eq(username.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if username_taken {
                return Err(EngineError::ExistingKey(username));
            }
            let email_taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if email_taken {
                return Err(EngineError::ExistingKey(email));
            }

            // the unique indexes catch a registration racing the checks above
            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                username: ActiveValue::Set(username.clone()),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(cmd.password_hash),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(username),
                _ => EngineError::from(err),
            })?;

            let wallet = Wallet::new(
                model.id,
                DEFAULT_WALLET_NAME.to_string(),
                Currency::default(),
            );
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;

            for (name, kind, color, icon) in DEFAULT_CATEGORIES {
                let category = Category {
                    id: Uuid::new_v4(),
                    user_id: model.id,
                    name: (*name).to_string(),
                    kind: *kind,
                    color: Some((*color).to_string()),
                    icon: Some((*icon).to_string()),
                };
                categories::ActiveModel::from(&category)
                    .insert(&db_tx)
                    .await?;
            }

            Ok(User::from(model))
        })
    }

    /// Looks up a user by id.
    ///
    /// Used to turn a trusted identity handed over by the authentication
    /// layer into a known user.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<Option<User>> {
        with_tx!(self, |db_tx| {
            match self.require_user(&db_tx, user_id).await {
                Ok(model) => Ok(Some(User::from(model))),
                Err(EngineError::KeyNotFound(_)) => Ok(None),
                Err(err) => Err(err),
            }
        })
    }
}
