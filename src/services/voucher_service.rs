//! Welcome voucher onboarding.
//!
//! A new customer and their welcome voucher are written together: the
//! voucher references the customer inserted by the first step, and neither
//! row survives if the other is rejected.

use crate::{
    error::AppError,
    models::voucher::WelcomeVoucherRequest,
    unit_of_work::{ExecutionResult, Statement, Store, UnitOfWork, UnitOfWorkExecutor},
};

/// Build the two-step unit: `customer` then `voucher`.
pub fn welcome_voucher_unit(request: WelcomeVoucherRequest) -> UnitOfWork {
    UnitOfWork::new("welcome_voucher")
        .step(
            Statement::new(
                "customer",
                "INSERT INTO customers (cust_id, cust_name) VALUES ($1, $2) RETURNING *",
            )
            .bind(request.cust_id)
            .bind(request.cust_name),
        )
        .step(
            Statement::new(
                "voucher",
                r#"
                INSERT INTO welcome_vouchers (voucher_id, cust_id, voucher_name, expiry)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(request.voucher_id)
            .bind(request.cust_id)
            .bind(request.voucher_name)
            .bind(request.expiry),
        )
}

/// Create the customer and their voucher atomically.
///
/// # Returns
///
/// `{ "customer": {...}, "voucher": {...} }` once both rows are committed.
///
/// # Errors
///
/// - `UnitOfWork`: either insert failed; nothing was written
pub async fn issue_welcome_voucher<S: Store>(
    executor: &UnitOfWorkExecutor<S>,
    request: WelcomeVoucherRequest,
) -> Result<ExecutionResult, AppError> {
    let cust_id = request.cust_id;
    let result = executor.run(welcome_voucher_unit(request)).await?;
    tracing::info!(cust_id, "welcome voucher issued");

    Ok(result)
}
