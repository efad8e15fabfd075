use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    CreateTransactionCmd, Money, ResultEngine, Transaction, UpdateTransactionCmd, transactions,
    util::{MAX_DESCRIPTION_LEN, Validator, normalize_optional_text},
};

use super::super::{Engine, with_tx};

/// Shared field checks of create and update. Returns the normalized
/// description.
fn validate_fields(amount: Money, description: Option<&str>) -> ResultEngine<Option<String>> {
    let description = normalize_optional_text(description);
    let mut validator = Validator::new();
    validator.positive_amount(amount).check(
        description
            .as_ref()
            .is_none_or(|d| d.chars().count() <= MAX_DESCRIPTION_LEN),
        format!("description must be at most {MAX_DESCRIPTION_LEN} characters"),
    );
    validator.finish()?;
    Ok(description)
}

impl Engine {
    /// Records a transaction and brings its wallet balance up to date.
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
        let description = validate_fields(cmd.amount, cmd.description.as_deref())?;

        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, cmd.user_id, cmd.wallet_id)
                .await?;
            self.require_optional_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;

            let now = Utc::now();
            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                wallet_id: cmd.wallet_id,
                category_id: cmd.category_id,
                amount: cmd.amount,
                kind: cmd.kind,
                description,
                transaction_date: cmd.transaction_date,
                created_at: now,
                updated_at: now,
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            self.recalculate_balance(&db_tx, tx.wallet_id).await?;
            Ok(tx)
        })
    }

    /// Replaces every editable field of a transaction.
    ///
    /// Both the wallet it was on and, when it moved, the wallet it moved to
    /// are recalculated.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        let description = validate_fields(cmd.amount, cmd.description.as_deref())?;

        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, cmd.user_id, cmd.transaction_id)
                .await?;
            self.require_wallet(&db_tx, cmd.user_id, cmd.wallet_id)
                .await?;
            self.require_optional_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(existing.id),
                wallet_id: ActiveValue::Set(cmd.wallet_id),
                category_id: ActiveValue::Set(cmd.category_id),
                amount_minor: ActiveValue::Set(cmd.amount.minor()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                description: ActiveValue::Set(description),
                transaction_date: ActiveValue::Set(cmd.transaction_date),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;

            self.recalculate_balance(&db_tx, existing.wallet_id).await?;
            if existing.wallet_id != cmd.wallet_id {
                self.recalculate_balance(&db_tx, cmd.wallet_id).await?;
            }
            Transaction::try_from(model)
        })
    }

    /// Removes a transaction; its wallet balance no longer counts it.
    pub async fn delete_transaction(&self, user_id: Uuid, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;

            transactions::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;
            self.recalculate_balance(&db_tx, existing.wallet_id).await?;
            Ok(())
        })
    }
}
