//! Business logic services.
//!
//! Services turn validated request payloads into units of work and run them.
//! Handlers stay thin; the SQL for multi-statement writes lives here.

pub mod order_service;
pub mod voucher_service;
