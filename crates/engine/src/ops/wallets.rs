use chrono::Utc;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{Currency, EngineError, ResultEngine, Wallet, transactions, util::Validator, wallets};

use super::{Engine, with_tx};

/// Parses an optional currency, collecting the problem instead of failing
/// fast so it is reported together with the other fields.
fn validated_currency(validator: &mut Validator, currency: Option<&str>) -> Currency {
    match currency.map(Currency::try_from).transpose() {
        Ok(currency) => currency.unwrap_or_default(),
        Err(err) => {
            for message in err.messages() {
                validator.check(false, message);
            }
            Currency::default()
        }
    }
}

impl Engine {
    async fn ensure_wallet_name_free(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(Expr::expr(Expr::cust("LOWER(name)")).eq(name.to_lowercase()));
        if let Some(id) = except {
            query = query.filter(wallets::Column::Id.ne(id));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }

    /// Add a new, empty wallet.
    ///
    /// `currency` defaults to `USD`. Names are unique per user
    /// (case-insensitive).
    pub async fn new_wallet(
        &self,
        user_id: Uuid,
        name: &str,
        currency: Option<&str>,
    ) -> ResultEngine<Wallet> {
        let mut validator = Validator::new();
        let name = validator.required_name(name, "wallet");
        let currency = validated_currency(&mut validator, currency);
        validator.finish()?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            self.ensure_wallet_name_free(&db_tx, user_id, &name, None)
                .await?;

            let wallet = Wallet::new(user_id, name, currency);
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            Wallet::try_from(model)
        })
    }

    /// All wallets of a user, newest first.
    pub async fn wallets(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id))
                .order_by_desc(wallets::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Wallet::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Renames a wallet and/or changes its currency.
    ///
    /// The balance is never touched here; amounts already recorded are not
    /// converted.
    pub async fn update_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
        name: &str,
        currency: Option<&str>,
    ) -> ResultEngine<Wallet> {
        let mut validator = Validator::new();
        let name = validator.required_name(name, "wallet");
        let currency = match currency {
            Some(_) => Some(validated_currency(&mut validator, currency)),
            None => None,
        };
        validator.finish()?;

        with_tx!(self, |db_tx| {
            let existing = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            self.ensure_wallet_name_free(&db_tx, user_id, &name, Some(wallet_id))
                .await?;

            let currency = currency.map_or(existing.currency, |c| c.code().to_string());
            let active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet_id),
                name: ActiveValue::Set(name),
                currency: ActiveValue::Set(currency),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Wallet::try_from(model)
        })
    }

    /// Deletes a wallet together with every transaction recorded on it.
    pub async fn delete_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, user_id, wallet_id).await?;

            transactions::Entity::delete_many()
                .filter(transactions::Column::WalletId.eq(wallet_id))
                .exec(&db_tx)
                .await?;
            wallets::Entity::delete_by_id(wallet_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
