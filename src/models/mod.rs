//! Data models representing database entities and request bodies.

/// Customer model
pub mod customer;
/// Order model
pub mod order;
/// Welcome voucher model
pub mod voucher;
