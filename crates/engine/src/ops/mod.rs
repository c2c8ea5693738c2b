use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::ResultEngine;

mod accounts;
mod expenses;
mod incomes;
mod limits;
mod reports;
mod users;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Open a unit of work backed by a fresh database transaction.
    pub async fn unit_of_work(&self) -> ResultEngine<UnitOfWork> {
        let tx = self.database.begin().await?;
        Ok(UnitOfWork { tx })
    }
}

/// One short-lived transaction over the ledger.
///
/// Every read sees the writes made earlier in the same unit of work.
/// Nothing is visible to other units of work until [`commit`](Self::commit).
#[derive(Debug)]
pub struct UnitOfWork {
    tx: DatabaseTransaction,
}

impl UnitOfWork {
    pub async fn commit(self) -> ResultEngine<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> ResultEngine<()> {
        self.tx.rollback().await?;
        Ok(())
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
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
