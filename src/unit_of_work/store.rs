//! The connection/pool provider seam.
//!
//! The executor only talks to these traits. `PgPool` implements them for
//! production use; tests plug in a scripted store.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::statement::{IsolationLevel, Statement};

/// A single result row keyed by column name.
pub type Row = Map<String, Value>;

/// Error reported by the store, carrying its diagnostic code when it has one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    /// SQLSTATE for database errors, e.g. `23503` for a foreign key violation.
    pub code: Option<String>,
    pub constraint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            constraint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

/// Hands out connection leases. Shared by every request task.
#[async_trait]
pub trait Store: Send + Sync {
    type Lease: Lease;

    /// Check out one connection for exclusive use.
    async fn acquire(&self) -> Result<Self::Lease, StoreError>;
}

/// An exclusively held connection.
///
/// Dropping the lease returns the connection to its pool. Implementations
/// must not hand a connection back while a transaction is open, or while a
/// `begin`/`commit` future was dropped before completing.
#[async_trait]
pub trait Lease: Send {
    async fn begin(&mut self, isolation: IsolationLevel) -> Result<(), StoreError>;

    /// Run one statement with its parameters bound positionally.
    async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}
