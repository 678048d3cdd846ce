//! Welcome voucher HTTP handlers.
//!
//! - POST /welcome-voucher - Create customer and voucher in one transaction
//! - GET /vouchers - List issued vouchers

use crate::{
    db::DbPool,
    error::AppError,
    models::voucher::{Voucher, WelcomeVoucherRequest},
    services::voucher_service,
    unit_of_work::{ExecutionResult, Store, UnitOfWorkExecutor},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

/// Create a customer together with their welcome voucher.
///
/// # Request Body
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
/// # Response (201)
///
/// ```json
/// {
///   "customer": { "cust_id": 10, "cust_name": "Asha" },
///   "voucher": { "voucher_id": 1, "cust_id": 10, "voucher_name": "WELCOME10", "expiry": "2026-01-01" }
/// }
/// ```
///
/// On failure both inserts are rolled back and a single
/// `{ "error": "..." }` object is returned with status 500.
pub async fn welcome_voucher<S: Store>(
    State(executor): State<UnitOfWorkExecutor<S>>,
    payload: Result<Json<WelcomeVoucherRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExecutionResult>), AppError> {
    let Json(request) = payload?;

    let result = voucher_service::issue_welcome_voucher(&executor, request).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn list_vouchers(State(pool): State<DbPool>) -> Result<Json<Vec<Voucher>>, AppError> {
    let vouchers = sqlx::query_as::<_, Voucher>(
        "SELECT voucher_id, cust_id, voucher_name, expiry FROM welcome_vouchers ORDER BY voucher_id",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(vouchers))
}
