use chrono::NaiveDate;
use uuid::Uuid;

use sea_orm::{
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{Money, ResultEngine, TransactionKind, categories, transactions};

use super::super::{Engine, with_tx};
use super::{CategoryTotal, Summary, ensure_ordered_range};

#[derive(Debug, FromQueryResult)]
struct BreakdownRow {
    category_id: Uuid,
    name: String,
    color: Option<String>,
    icon: Option<String>,
    total: i64,
    count: i64,
}

impl From<BreakdownRow> for CategoryTotal {
    fn from(row: BreakdownRow) -> Self {
        Self {
            category_id: row.category_id,
            name: row.name,
            color: row.color,
            icon: row.icon,
            total: Money::new(row.total),
            count: u64::try_from(row.count).unwrap_or_default(),
        }
    }
}

impl Engine {
    /// Income and expense totals over `[start_date, end_date]`.
    ///
    /// An empty window yields zeros.
    pub async fn summary(
        &self,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ResultEngine<Summary> {
        ensure_ordered_range(Some(start_date), Some(end_date))?;

        with_tx!(self, |db_tx| {
            let totals: Option<(i64, i64, i64)> = transactions::Entity::find()
                .select_only()
                .column_as(
                    Expr::cust(
                        "COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_minor ELSE 0 END), 0)",
                    ),
                    "total_income",
                )
                .column_as(
                    Expr::cust(
                        "COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_minor ELSE 0 END), 0)",
                    ),
                    "total_expense",
                )
                .column_as(Expr::cust("COUNT(*)"), "transaction_count")
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::TransactionDate.between(start_date, end_date))
                .into_tuple()
                .one(&db_tx)
                .await?;

            let (income, expense, count) = totals.unwrap_or_default();
            Ok(Summary {
                total_income: Money::new(income),
                total_expense: Money::new(expense),
                transaction_count: u64::try_from(count).unwrap_or_default(),
            })
        })
    }

    /// Totals per category of one kind over `[start_date, end_date]`,
    /// largest first.
    ///
    /// Uncategorized transactions are left out. Ties are ordered by name.
    pub async fn category_breakdown(
        &self,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: TransactionKind,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        ensure_ordered_range(Some(start_date), Some(end_date))?;

        with_tx!(self, |db_tx| {
            let rows = transactions::Entity::find()
                .select_only()
                .column_as(categories::Column::Id, "category_id")
                .column_as(categories::Column::Name, "name")
                .column_as(categories::Column::Color, "color")
                .column_as(categories::Column::Icon, "icon")
                .column_as(Expr::cust("SUM(transactions.amount_minor)"), "total")
                .column_as(Expr::cust("COUNT(transactions.id)"), "count")
                .join(JoinType::InnerJoin, transactions::Relation::Category.def())
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::Kind.eq(kind.as_str()))
                .filter(transactions::Column::TransactionDate.between(start_date, end_date))
                .group_by(categories::Column::Id)
                .group_by(categories::Column::Name)
                .group_by(categories::Column::Color)
                .group_by(categories::Column::Icon)
                .order_by_desc(Expr::cust("total"))
                .order_by_asc(categories::Column::Name)
                .into_model::<BreakdownRow>()
                .all(&db_tx)
                .await?;

            Ok(rows.into_iter().map(CategoryTotal::from).collect())
        })
    }
}
