//! Command structs for engine operations.
//!
//! These types group parameters for write operations (users, categories,
//! transactions), keeping call sites readable and avoiding long argument
//! lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Money, TransactionKind};

/// Register a user (and provision their default wallet and categories).
#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub username: String,
    pub email: String,
    /// Already-hashed credential.
    pub password_hash: String,
}

/// Create or replace a category.
#[derive(Clone, Debug)]
pub struct CategoryCmd {
    pub user_id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryCmd {
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            user_id,
            name: name.into(),
            kind,
            color: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Create a transaction.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        wallet_id: Uuid,
        amount: Money,
        kind: TransactionKind,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            wallet_id,
            category_id: None,
            amount,
            kind,
            description: None,
            transaction_date,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Replace every editable field of an existing transaction.
///
/// Moving a transaction to another wallet is done by changing `wallet_id`.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: Uuid,
    pub transaction_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

impl UpdateTransactionCmd {
    /// Starts from the current state of `tx`, so callers only override what
    /// changes.
    #[must_use]
    pub fn from_existing(tx: &crate::Transaction) -> Self {
        Self {
            user_id: tx.user_id,
            transaction_id: tx.id,
            wallet_id: tx.wallet_id,
            category_id: tx.category_id,
            amount: tx.amount,
            kind: tx.kind,
            description: tx.description.clone(),
            transaction_date: tx.transaction_date,
        }
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = wallet_id;
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }
}
