//! JSON payloads of the HTTP API.
//!
//! Field names are camelCase on the wire. Money travels as integer minor
//! units (`amountMinor`, `balanceMinor`, ...) next to a formatted decimal
//! string; transaction payloads may send a decimal `amount` instead of
//! `amountMinor`. Transaction and category kinds
//! travel as the plain strings `"income"` / `"expense"` under the `type` key
//! and are validated by the server, so a bad value is reported like any other
//! invalid field.

use serde::{Deserialize, Serialize};

/// Body of every `4xx`/`5xx` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Body of successful deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod wallet {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// Create or replace a wallet. `currency` defaults to `USD` on create and
    /// is left unchanged on update when absent.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletUpsert {
        pub name: String,
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub balance_minor: i64,
        /// `balance_minor` rendered with two decimals, e.g. `"-50.00"`.
        pub balance: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletResponse {
        pub wallet: WalletView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletsResponse {
        pub wallets: Vec<WalletView>,
    }
}

pub mod category {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// Create or replace a category.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUpsert {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    /// Query of `GET /categories`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryResponse {
        pub category: CategoryView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod transaction {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// A decimal amount as sent by clients: `12.5` or `"12,50"`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum DecimalAmount {
        Number(f64),
        Text(String),
    }

    impl std::fmt::Display for DecimalAmount {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Number(value) => write!(f, "{value}"),
                Self::Text(value) => f.write_str(value),
            }
        }
    }

    /// Create a transaction, or replace every field of an existing one.
    ///
    /// Exactly one of `amount` and `amountMinor` must be given. Either way the
    /// amount must be > 0; the sign comes from `type`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpsert {
        pub wallet_id: Uuid,
        pub category_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<DecimalAmount>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount_minor: Option<i64>,
        #[serde(rename = "type")]
        pub kind: String,
        pub description: Option<String>,
        /// Calendar date, `YYYY-MM-DD`.
        pub transaction_date: NaiveDate,
    }

    /// Query of `GET /transactions`. Dates are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionList {
        pub wallet_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub wallet_name: Option<String>,
        pub category_id: Option<Uuid>,
        pub category_name: Option<String>,
        pub category_color: Option<String>,
        pub category_icon: Option<String>,
        /// Formatted with two decimals, e.g. `"12.50"`.
        pub amount: String,
        pub amount_minor: i64,
        #[serde(rename = "type")]
        pub kind: String,
        pub description: Option<String>,
        pub transaction_date: NaiveDate,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionResponse {
        pub transaction: TransactionView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Query of `GET /transactions/summary`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryQuery {
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryView {
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_minor: i64,
        pub transaction_count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub summary: SummaryView,
    }

    /// Query of `GET /transactions/breakdown`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BreakdownQuery {
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryTotalView {
        pub category_id: Uuid,
        pub name: String,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub total_minor: i64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BreakdownResponse {
        pub breakdown: Vec<CategoryTotalView>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_payload_uses_camel_case_and_type_key() {
        let body = serde_json::json!({
            "walletId": "6f1c7a4e-8d47-4a55-9df8-55d1bb2f4f0e",
            "amountMinor": 1250,
            "type": "expense",
            "transactionDate": "2024-05-01"
        });
        let parsed: transaction::TransactionUpsert = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.kind, "expense");
        assert_eq!(parsed.amount_minor, Some(1250));
        assert!(parsed.amount.is_none());
        assert!(parsed.category_id.is_none());
        assert!(parsed.description.is_none());
    }

    #[test]
    fn decimal_amount_accepts_numbers_and_strings() {
        let parse = |amount: serde_json::Value| {
            let body = serde_json::json!({
                "walletId": "6f1c7a4e-8d47-4a55-9df8-55d1bb2f4f0e",
                "amount": amount,
                "type": "income",
                "transactionDate": "2024-05-01"
            });
            serde_json::from_value::<transaction::TransactionUpsert>(body)
                .unwrap()
                .amount
                .unwrap()
                .to_string()
        };
        assert_eq!(parse(serde_json::json!(12.5)), "12.5");
        assert_eq!(parse(serde_json::json!(40)), "40");
        assert_eq!(parse(serde_json::json!("12,50")), "12,50");
    }

    #[test]
    fn error_without_details_omits_errors() {
        let json = serde_json::to_value(ErrorResponse {
            error: "wallet not exists".to_string(),
            errors: Vec::new(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "error": "wallet not exists" }));
    }
}
