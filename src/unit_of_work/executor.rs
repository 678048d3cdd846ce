//! Runs a unit of work inside one transaction.
//!
//! ```text
//! IDLE -> LEASE_ACQUIRED -> TX_OPEN -> STEP_EXECUTING* -> COMMITTING -> COMMITTED
//!                              \______________________/
//!                                        -> ROLLING_BACK -> ROLLED_BACK
//! ```
//!
//! The lease is released after every terminal state, including a failed
//! rollback. A lease abandoned mid-`BEGIN` or mid-`COMMIT` by the deadline
//! is left to the store to close.

use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use super::error::UnitOfWorkError;
use super::result::{ExecutionResult, StepOutput};
use super::statement::{Fetch, UnitOfWork};
use super::store::{Lease, Store, StoreError};

/// Executes units of work against a shared [`Store`].
///
/// Cheap to clone when the store is (a `PgPool` is), so one executor can be
/// handed to every request handler.
#[derive(Debug, Clone)]
pub struct UnitOfWorkExecutor<S> {
    store: S,
    timeout: Duration,
}

impl<S: Store> UnitOfWorkExecutor<S> {
    /// `timeout` is one deadline for `BEGIN`, every step and `COMMIT`; a
    /// rollback gets a fresh bound of the same length.
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every step of `unit` atomically.
    ///
    /// Returns the rows of every step after `COMMIT`, or the first failure
    /// after `ROLLBACK`. Statements are never retried.
    #[tracing::instrument(
        name = "unit_of_work",
        skip_all,
        fields(unit = unit.label(), steps = unit.steps().len())
    )]
    pub async fn run(&self, unit: UnitOfWork) -> Result<ExecutionResult, UnitOfWorkError> {
        unit.validate().map_err(UnitOfWorkError::Invalid)?;

        let mut lease = self
            .store
            .acquire()
            .await
            .map_err(UnitOfWorkError::Acquire)?;
        tracing::debug!("lease acquired");

        let outcome = self.transact(&mut lease, &unit).await;

        drop(lease);
        tracing::debug!("lease released");

        outcome
    }

    async fn transact(
        &self,
        lease: &mut S::Lease,
        unit: &UnitOfWork,
    ) -> Result<ExecutionResult, UnitOfWorkError> {
        let deadline = Instant::now() + self.timeout;

        match timeout_at(deadline, lease.begin(unit.isolation())).await {
            Ok(begun) => begun.map_err(UnitOfWorkError::Begin)?,
            Err(_) => {
                // The lease may be mid-BEGIN; it is closed, not rolled back.
                tracing::error!("timed out opening transaction");
                return Err(self.timed_out());
            }
        }

        let steps = match timeout_at(deadline, run_steps(lease, unit)).await {
            Ok(steps) => steps,
            Err(_) => Err(self.timed_out()),
        };

        let result = match steps {
            Ok(result) => result,
            Err(mut err) => {
                tracing::warn!(
                    error = %err,
                    step = err.step(),
                    code = err.code(),
                    "unit of work failed, rolling back"
                );
                let rollback = self.roll_back(lease).await;
                err.set_rollback(rollback);
                return Err(err);
            }
        };

        match timeout_at(deadline, lease.commit()).await {
            Ok(committed) => committed.map_err(UnitOfWorkError::Commit)?,
            Err(_) => {
                // Outcome unknown; the lease still counts as in a transaction
                // and is closed when dropped.
                tracing::error!("timed out committing, outcome unknown");
                return Err(self.timed_out());
            }
        }

        tracing::info!(steps = result.len(), "unit of work committed");
        Ok(result)
    }

    fn timed_out(&self) -> UnitOfWorkError {
        UnitOfWorkError::TimedOut {
            after: self.timeout,
            rollback: None,
        }
    }

    async fn roll_back(&self, lease: &mut S::Lease) -> Option<StoreError> {
        match tokio::time::timeout(self.timeout, lease.rollback()).await {
            Ok(Ok(())) => {
                tracing::debug!("transaction rolled back");
                None
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "rollback failed");
                Some(err)
            }
            Err(_) => {
                let err = StoreError::new(format!(
                    "rollback timed out after {}ms",
                    self.timeout.as_millis()
                ));
                tracing::error!(error = %err, "rollback failed");
                Some(err)
            }
        }
    }
}

async fn run_steps<L: Lease>(
    lease: &mut L,
    unit: &UnitOfWork,
) -> Result<ExecutionResult, UnitOfWorkError> {
    let mut result = ExecutionResult::default();

    for statement in unit.steps() {
        tracing::debug!(step = statement.name(), "executing step");

        let rows = lease
            .execute(statement)
            .await
            .map_err(|source| UnitOfWorkError::Step {
                step: statement.name().to_owned(),
                source,
                rollback: None,
            })?;

        if statement.fetch() == Fetch::One && rows.is_empty() {
            return Err(UnitOfWorkError::NoRows {
                step: statement.name().to_owned(),
                rollback: None,
            });
        }

        result.push(StepOutput::new(
            statement.name().to_owned(),
            rows,
            statement.fetch(),
        ));
    }

    Ok(result)
}
