//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params)
//! 2. Runs one statement, or hands a unit of work to a service
//! 3. Returns a JSON response and status code

/// Customer CRUD endpoints
pub mod customers;
/// Service health endpoint
pub mod health;
/// Order CRUD and order placement endpoints
pub mod orders;
/// Welcome voucher endpoints
pub mod vouchers;
