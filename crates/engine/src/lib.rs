//! Walletbook engine.
//!
//! Users own wallets, categories and transactions. Every wallet carries a
//! cached balance that always equals the income minus the expenses recorded
//! on it; all mutations go through [`Engine`], which recalculates the affected
//! wallets inside the same database transaction as the write.

pub use categories::Category;
pub use commands::{CategoryCmd, CreateTransactionCmd, NewUserCmd, UpdateTransactionCmd};
pub use currency::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{CategoryTotal, Engine, EngineBuilder, Summary, TransactionListFilter};
pub use transactions::{Transaction, TransactionDetail, TransactionKind};
pub use users::User;
pub use wallets::Wallet;

mod categories;
mod commands;
mod currency;
mod error;
mod money;
mod ops;
mod transactions;
mod users;
mod util;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
