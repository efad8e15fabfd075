use chrono::Utc;
use uuid::Uuid;

use sea_orm::{
    ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait, prelude::*,
};

use crate::{EngineError, Money, ResultEngine, wallets};

use super::{Engine, with_tx};

/// Aggregate and write in one statement: a concurrent mutation on the same
/// wallet either sees the whole update or none of it.
const RECALCULATE_BALANCE_SQL: &str = "UPDATE wallets SET balance_minor = (\
     SELECT COALESCE(SUM(CASE kind \
         WHEN 'income' THEN amount_minor \
         WHEN 'expense' THEN -amount_minor \
         ELSE 0 END), 0) \
     FROM transactions WHERE wallet_id = ?), \
     updated_at = ? \
     WHERE id = ?";

impl Engine {
    /// Recomputes the denormalized balance of a wallet from its transactions
    /// and stores it.
    ///
    /// Runs on the caller's DB transaction and does not check ownership: the
    /// caller must already have validated `wallet_id`.
    pub(super) async fn recalculate_balance(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultEngine<Money> {
        let stmt = Statement::from_sql_and_values(
            db_tx.get_database_backend(),
            RECALCULATE_BALANCE_SQL,
            [wallet_id.into(), Utc::now().into(), wallet_id.into()],
        );
        let result = db_tx.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Err(EngineError::KeyNotFound("wallet not exists".to_string()));
        }

        let model = wallets::Entity::find_by_id(wallet_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        Ok(Money::new(model.balance_minor))
    }

    /// Rebuilds a wallet balance from the ledger.
    ///
    /// Mutations already keep balances in sync; this is a repair tool for
    /// rows edited outside the engine.
    pub async fn recalculate_wallet_balance(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
    ) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, user_id, wallet_id).await?;
            self.recalculate_balance(&db_tx, wallet_id).await
        })
    }
}
