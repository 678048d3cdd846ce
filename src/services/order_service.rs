//! Order placement.
//!
//! Placing an order locks the customer row, then inserts the order, in one
//! transaction. A missing customer aborts the unit before anything is
//! written.

use crate::{
    error::AppError,
    models::order::CreateOrderRequest,
    unit_of_work::{ExecutionResult, Statement, Store, UnitOfWork, UnitOfWorkExecutor},
};

/// Build the two-step unit: `customer` (locked) then `order`.
pub fn place_order_unit(request: CreateOrderRequest) -> UnitOfWork {
    UnitOfWork::new("place_order")
        .step(
            // FOR UPDATE keeps the customer from being deleted under the order
            Statement::new(
                "customer",
                "SELECT cust_id, cust_name FROM customers WHERE cust_id = $1 FOR UPDATE",
            )
            .bind(request.customer_id),
        )
        .step(
            Statement::new(
                "order",
                r#"
                INSERT INTO orders (order_id, customer_id, product_name, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(request.order_id)
            .bind(request.customer_id)
            .bind(request.product_name)
            .bind(request.quantity),
        )
}

/// Place an order for an existing customer.
///
/// # Returns
///
/// `{ "customer": {...}, "order": {...} }` after commit.
///
/// # Errors
///
/// - `InvalidRequest`: quantity is zero or negative
/// - `UnitOfWork`: customer missing, duplicate order id, or any store failure
pub async fn place_order<S: Store>(
    executor: &UnitOfWorkExecutor<S>,
    request: CreateOrderRequest,
) -> Result<ExecutionResult, AppError> {
    validate_order(&request)?;

    let order_id = request.order_id;
    let result = executor.run(place_order_unit(request)).await?;
    tracing::info!(order_id, "order placed");

    Ok(result)
}

/// Reject orders that can never succeed.
pub fn validate_order(request: &CreateOrderRequest) -> Result<(), AppError> {
    validate_quantity(request.quantity)
}

/// Quantities must be positive, on create and on update.
pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidRequest(
            "Quantity must be positive".to_string(),
        ));
    }
    Ok(())
}
