use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, TransactionKind};

mod list;
mod reports;
mod write;

/// Filters for listing transactions.
///
/// Dates are inclusive on both ends. Unset fields do not restrict the result;
/// an unset `limit` returns every match.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub wallet_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u64>,
}

/// Totals of a date window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Money,
    pub total_expense: Money,
    pub transaction_count: u64,
}

impl Summary {
    pub fn net(&self) -> Money {
        self.total_income.saturating_sub(self.total_expense)
    }
}

/// One row of a category breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub total: Money,
    pub count: u64,
}

fn ensure_ordered_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ResultEngine<()> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(EngineError::InvalidRange(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_is_income_minus_expense() {
        let summary = Summary {
            total_income: Money::new(10_000),
            total_expense: Money::new(13_050),
            transaction_count: 3,
        };
        assert_eq!(summary.net(), Money::new(-3_050));
    }

    #[test]
    fn range_must_not_be_reversed() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        assert!(ensure_ordered_range(Some(d(1)), Some(d(1))).is_ok());
        assert!(ensure_ordered_range(Some(d(1)), None).is_ok());
        assert!(matches!(
            ensure_ordered_range(Some(d(2)), Some(d(1))),
            Err(EngineError::InvalidRange(_))
        ));
    }
}
