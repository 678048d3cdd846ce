//! Order HTTP handlers.
//!
//! - GET /orders - List orders
//! - POST /orders - Create order (single insert)
//! - GET /orders/{order_id} - Get order
//! - PUT /orders/{order_id} - Update product and quantity
//! - DELETE /orders/{order_id} - Delete order
//! - POST /place-order - Lock customer and insert order in one transaction

use crate::{
    db::DbPool,
    error::AppError,
    models::order::{CreateOrderRequest, Order, UpdateOrderRequest},
    services::order_service,
    unit_of_work::{ExecutionResult, Store, UnitOfWorkExecutor},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

pub async fn list_orders(State(pool): State<DbPool>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT order_id, customer_id, product_name, quantity FROM orders ORDER BY order_id",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(orders))
}

/// Create an order with a single insert.
///
/// # Request Body
///
/// ```json
/// {
///   "order_id": 105,
///   "customer_id": 5,
///   "product_name": "Sneakers",
///   "quantity": 3
/// }
/// ```
pub async fn create_order(
    State(pool): State<DbPool>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let Json(request) = payload?;
    order_service::validate_order(&request)?;

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (order_id, customer_id, product_name, quantity)
        VALUES ($1, $2, $3, $4)
        RETURNING order_id, customer_id, product_name, quantity
        "#,
    )
    .bind(request.order_id)
    .bind(request.customer_id)
    .bind(request.product_name)
    .bind(request.quantity)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(pool): State<DbPool>,
    Path(order_id): Path<i32>,
) -> Result<Json<Order>, AppError> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT order_id, customer_id, product_name, quantity FROM orders WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    Ok(Json(order))
}

pub async fn update_order(
    State(pool): State<DbPool>,
    Path(order_id): Path<i32>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let Json(request) = payload?;
    order_service::validate_quantity(request.quantity)?;

    let order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders SET product_name = $1, quantity = $2
        WHERE order_id = $3
        RETURNING order_id, customer_id, product_name, quantity
        "#,
    )
    .bind(request.product_name)
    .bind(request.quantity)
    .bind(order_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    Ok(Json(order))
}

pub async fn delete_order(
    State(pool): State<DbPool>,
    Path(order_id): Path<i32>,
) -> Result<Json<Order>, AppError> {
    let order = sqlx::query_as::<_, Order>(
        "DELETE FROM orders WHERE order_id = $1 RETURNING order_id, customer_id, product_name, quantity",
    )
    .bind(order_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    Ok(Json(order))
}

/// Place an order for an existing customer.
///
/// # Atomicity
///
/// The customer row is locked and the order inserted in one transaction.
///
/// # Response
///
/// - **201 Created**: `{ "customer": {...}, "order": {...} }`
/// - **400**: malformed body or non-positive quantity
/// - **500**: `{ "error": "...", "code": "..." }`, nothing written
pub async fn place_order<S: Store>(
    State(executor): State<UnitOfWorkExecutor<S>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExecutionResult>), AppError> {
    let Json(request) = payload?;

    let result = order_service::place_order(&executor, request).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
