use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::error::CascadeError;
use crate::plan::{DeleteDescriptor, RowSet, Value};


/// Caller options forwarded untouched to the final, non-cascading delete.
pub type PassThrough = serde_json::Map<String, serde_json::Value>;


#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Foreign key violation: {table}.{column} = {value} -> {referenced_table}.{referenced_column}")]
    ForeignKeyViolation {
        table: String,
        column: String,
        referenced_table: String,
        referenced_column: String,
        value: Value,
    },
    #[error("Unique violation: {table}.{column} = {value}")]
    UniqueViolation {
        table: String,
        column: String,
        value: Value,
    },
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("{0}")]
    Statement(String),
}

impl StorageError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::ForeignKeyViolation { .. } | Self::UniqueViolation { .. }
        )
    }
}


/// Relational storage the cascade runs against.
#[async_trait]
pub trait Storage: Send + Sync {
    type Tx: Transaction;

    async fn begin(&self) -> Result<Self::Tx, StorageError>;

    /// Ordinary non-cascading delete outside any transaction.
    async fn destroy(&self, rows: &RowSet, options: &PassThrough) -> Result<u64, StorageError>;
}


/// One open transaction. Dropping it without `commit` must discard its work.
#[async_trait]
pub trait Transaction: Send {
    async fn delete_where(&mut self, descriptor: &DeleteDescriptor) -> Result<u64, StorageError>;

    /// Ordinary non-cascading delete bound to this transaction.
    async fn destroy(&mut self, rows: &RowSet, options: &PassThrough) -> Result<u64, StorageError>;

    async fn commit(self) -> Result<(), StorageError>;

    async fn rollback(self) -> Result<(), StorageError>;
}


/// Runs `f` in a fresh transaction: commit on `Ok`, roll back on `Err`.
pub async fn run_in_transaction<S, T, F>(storage: &S, f: F) -> Result<T, CascadeError>
where
    S: Storage,
    T: Send,
    F: for<'t> FnOnce(&'t mut S::Tx) -> BoxFuture<'t, Result<T, CascadeError>> + Send,
{
    let mut tx = storage.begin().await?;
    debug!("Transaction opened");

    match f(&mut tx).await {
        Ok(value) => {
            tx.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(e) => {
            warn!("Rolling back transaction: {}", e);
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
