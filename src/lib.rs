//! Customers, orders and welcome vouchers over PostgreSQL.
//!
//! Single-statement CRUD handlers talk to the pool directly. Requests that
//! write several dependent rows go through [`unit_of_work`], which runs them
//! on one leased connection inside one transaction.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod unit_of_work;
