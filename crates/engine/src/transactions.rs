//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense event recorded on exactly one
//! wallet. The amount is always stored positive; the sign comes from the kind.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, FromQueryResult, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidKind(format!(
                "type must be income or expense, got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A transaction together with the labels of what it references, as shown in
/// listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub wallet_name: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub category_icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub kind: String,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Wallet,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id),
            wallet_id: ActiveValue::Set(tx.wallet_id),
            category_id: ActiveValue::Set(tx.category_id),
            amount_minor: ActiveValue::Set(tx.amount.minor()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            description: ActiveValue::Set(tx.description.clone()),
            transaction_date: ActiveValue::Set(tx.transaction_date),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            wallet_id: model.wallet_id,
            category_id: model.category_id,
            amount: Money::new(model.amount_minor),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            description: model.description,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Row shape of the joined listing query (`transactions` + category + wallet
/// labels).
#[derive(Debug, FromQueryResult)]
pub(crate) struct DetailRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub kind: String,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub wallet_name: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub category_icon: Option<String>,
}

impl TryFrom<DetailRow> for TransactionDetail {
    type Error = EngineError;

    fn try_from(row: DetailRow) -> Result<Self, Self::Error> {
        let transaction = Transaction::try_from(Model {
            id: row.id,
            user_id: row.user_id,
            wallet_id: row.wallet_id,
            category_id: row.category_id,
            amount_minor: row.amount_minor,
            kind: row.kind,
            description: row.description,
            transaction_date: row.transaction_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })?;
        Ok(Self {
            transaction,
            wallet_name: row.wallet_name,
            category_name: row.category_name,
            category_color: row.category_color,
            category_icon: row.category_icon,
        })
    }
}
