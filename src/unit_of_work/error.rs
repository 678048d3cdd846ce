//! Failure outcomes of a unit of work.
//!
//! Pre-transaction failures (`Invalid`, `Acquire`, `Begin`) never issue a
//! rollback. Everything after `BEGIN` does, and keeps the rollback's own
//! failure as a secondary error next to the primary cause.

use std::time::Duration;

use super::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum UnitOfWorkError {
    /// The unit failed structural validation before touching the store.
    #[error("invalid unit of work: {0}")]
    Invalid(String),

    #[error("failed to acquire a connection: {0}")]
    Acquire(#[source] StoreError),

    #[error("failed to begin transaction: {0}")]
    Begin(#[source] StoreError),

    /// A statement was rejected by the store.
    #[error("{source}")]
    Step {
        step: String,
        #[source]
        source: StoreError,
        rollback: Option<StoreError>,
    },

    /// A step declared to return a row returned none.
    #[error("step '{step}' returned no rows")]
    NoRows {
        step: String,
        rollback: Option<StoreError>,
    },

    #[error("failed to commit transaction: {0}")]
    Commit(#[source] StoreError),

    #[error("unit of work timed out after {}ms", .after.as_millis())]
    TimedOut {
        after: Duration,
        rollback: Option<StoreError>,
    },
}

impl UnitOfWorkError {
    /// Store diagnostic code of the primary failure, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            UnitOfWorkError::Acquire(source)
            | UnitOfWorkError::Begin(source)
            | UnitOfWorkError::Commit(source)
            | UnitOfWorkError::Step { source, .. } => source.code.as_deref(),
            UnitOfWorkError::Invalid(_)
            | UnitOfWorkError::NoRows { .. }
            | UnitOfWorkError::TimedOut { .. } => None,
        }
    }

    /// The failing step, for in-transaction statement failures.
    pub fn step(&self) -> Option<&str> {
        match self {
            UnitOfWorkError::Step { step, .. } | UnitOfWorkError::NoRows { step, .. } => {
                Some(step)
            }
            _ => None,
        }
    }

    /// Secondary error raised while rolling back.
    pub fn rollback_error(&self) -> Option<&StoreError> {
        match self {
            UnitOfWorkError::Step { rollback, .. }
            | UnitOfWorkError::NoRows { rollback, .. }
            | UnitOfWorkError::TimedOut { rollback, .. } => rollback.as_ref(),
            _ => None,
        }
    }

    /// Whether the failure happened after `BEGIN`.
    pub fn is_in_transaction(&self) -> bool {
        matches!(
            self,
            UnitOfWorkError::Step { .. }
                | UnitOfWorkError::NoRows { .. }
                | UnitOfWorkError::Commit(_)
                | UnitOfWorkError::TimedOut { .. }
        )
    }

    pub(crate) fn set_rollback(&mut self, failure: Option<StoreError>) {
        match self {
            UnitOfWorkError::Step { rollback, .. }
            | UnitOfWorkError::NoRows { rollback, .. }
            | UnitOfWorkError::TimedOut { rollback, .. } => *rollback = failure,
            _ => {}
        }
    }
}
