//! Welcome voucher request and row types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row of the `welcome_vouchers` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Voucher {
    pub voucher_id: i32,
    pub cust_id: i32,
    pub voucher_name: String,
    pub expiry: NaiveDate,
}

/// Request body for creating a customer together with their welcome voucher.
///
/// # JSON Example
///
/// ```json
/// {
///   "cust_id": 10,
///   "cust_name": "Asha",
///   "voucher_id": 1,
///   "voucher_name": "WELCOME10",
///   "expiry": "2026-01-01"
/// }
/// ```
///
/// The shorter `id`, `name` and `date` keys are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct WelcomeVoucherRequest {
    #[serde(alias = "id")]
    pub cust_id: i32,

    pub cust_name: String,

    pub voucher_id: i32,

    #[serde(alias = "name")]
    pub voucher_name: String,

    /// `YYYY-MM-DD`
    #[serde(alias = "date")]
    pub expiry: NaiveDate,
}
