use uuid::Uuid;

use sea_orm::{
    DatabaseTransaction, Iterable, JoinType, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, prelude::*,
};

use crate::{
    EngineError, ResultEngine, TransactionDetail, categories, transactions, transactions::DetailRow,
    wallets,
};

use super::super::{Engine, with_tx};
use super::{TransactionListFilter, ensure_ordered_range};

/// Largest accepted `limit`; SQLite binds it as a signed 64-bit integer.
const MAX_LIMIT: u64 = i64::MAX as u64;

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    match filter.limit {
        Some(0) => {
            return Err(EngineError::Validation(vec![
                "limit must be greater than 0".to_string(),
            ]));
        }
        Some(limit) if limit > MAX_LIMIT => {
            return Err(EngineError::Validation(vec![format!(
                "limit must be at most {MAX_LIMIT}"
            )]));
        }
        _ => {}
    }
    ensure_ordered_range(filter.start_date, filter.end_date)
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(wallet_id) = filter.wallet_id {
            self = self.filter(transactions::Column::WalletId.eq(wallet_id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(start) = filter.start_date {
            self = self.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(transactions::Column::TransactionDate.lte(end));
        }
        self
    }
}

/// Transactions joined with the labels of their wallet and category.
fn detail_select() -> Select<transactions::Entity> {
    transactions::Entity::find()
        .select_only()
        .columns(transactions::Column::iter())
        .column_as(wallets::Column::Name, "wallet_name")
        .column_as(categories::Column::Name, "category_name")
        .column_as(categories::Column::Color, "category_color")
        .column_as(categories::Column::Icon, "category_icon")
        .join(JoinType::LeftJoin, transactions::Relation::Wallet.def())
        .join(JoinType::LeftJoin, transactions::Relation::Category.def())
}

impl Engine {
    /// Loads one transaction with its labels.
    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<TransactionDetail> {
        with_tx!(self, |db_tx| {
            let row = detail_select()
                .filter(transactions::Column::Id.eq(transaction_id))
                .filter(transactions::Column::UserId.eq(user_id))
                .into_model::<DetailRow>()
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            TransactionDetail::try_from(row)
        })
    }

    /// Lists the transactions of a user, newest first.
    ///
    /// Order is `transaction_date DESC, created_at DESC`. Filtering by a
    /// wallet or category the user does not own fails with
    /// [`EngineError::KeyNotFound`].
    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<TransactionDetail>> {
        validate_list_filter(filter)?;

        with_tx!(self, |db_tx| {
            self.check_filter_owner(&db_tx, user_id, filter).await?;

            let mut query = detail_select()
                .filter(transactions::Column::UserId.eq(user_id))
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::TransactionDate)
                .order_by_desc(transactions::Column::CreatedAt);
            if let Some(limit) = filter.limit {
                query = query.limit(limit);
            }

            query
                .into_model::<DetailRow>()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(TransactionDetail::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    async fn check_filter_owner(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
        filter: &TransactionListFilter,
    ) -> ResultEngine<()> {
        if let Some(wallet_id) = filter.wallet_id {
            self.require_wallet(db_tx, user_id, wallet_id).await?;
        }
        self.require_optional_category(db_tx, user_id, filter.category_id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn zero_limit_is_rejected() {
        let filter = TransactionListFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert!(validate_list_filter(&filter).unwrap_err().is_validation());
    }

    #[test]
    fn limit_beyond_signed_range_is_rejected() {
        let filter = TransactionListFilter {
            limit: Some(u64::MAX),
            ..Default::default()
        };
        let err = validate_list_filter(&filter).unwrap_err();
        assert_eq!(
            err.messages(),
            vec![format!("limit must be at most {}", i64::MAX)]
        );

        let filter = TransactionListFilter {
            limit: Some(MAX_LIMIT),
            ..Default::default()
        };
        assert!(validate_list_filter(&filter).is_ok());
    }

    #[test]
    fn reversed_window_is_rejected() {
        let filter = TransactionListFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(matches!(
            validate_list_filter(&filter),
            Err(EngineError::InvalidRange(_))
        ));
    }

    #[test]
    fn empty_filter_is_accepted() {
        assert!(validate_list_filter(&TransactionListFilter::default()).is_ok());
    }
}
