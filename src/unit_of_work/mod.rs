//! Transactional unit of work.
//!
//! A [`UnitOfWork`] is an ordered list of dependent [`Statement`]s. The
//! [`UnitOfWorkExecutor`] runs it on one leased connection inside a single
//! transaction: every step commits, or none is visible afterwards.

pub mod error;
pub mod executor;
pub mod postgres;
pub mod result;
pub mod statement;
pub mod store;

pub use error::UnitOfWorkError;
pub use executor::UnitOfWorkExecutor;
pub use postgres::PgLease;
pub use result::{ExecutionResult, StepOutput};
pub use statement::{Fetch, IsolationLevel, SqlParam, Statement, UnitOfWork};
pub use store::{Lease, Row, Store, StoreError};
