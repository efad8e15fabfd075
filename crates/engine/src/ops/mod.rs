use sea_orm::DatabaseConnection;

mod access;
mod balances;
mod categories;
mod transactions;
mod users;
mod wallets;

pub use transactions::{CategoryTotal, Summary, TransactionListFilter};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The rollback happens when the uncommitted `DatabaseTransaction` is dropped.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every read and write.
///
/// The engine holds no state besides the storage handle; it is cheap to share
/// behind an `Arc`.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
