//! Customer HTTP handlers.
//!
//! - GET /customers - List customers
//! - POST /customers - Create customer
//! - GET /customers/{id} - Get customer
//! - PUT /customers/{id} - Rename customer
//! - DELETE /customers/{id} - Delete customer, returning the removed row

use crate::{
    db::DbPool,
    error::AppError,
    models::customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

/// List every customer, ordered by id.
pub async fn list_customers(State(pool): State<DbPool>) -> Result<Json<Vec<Customer>>, AppError> {
    let customers =
        sqlx::query_as::<_, Customer>("SELECT cust_id, cust_name FROM customers ORDER BY cust_id")
            .fetch_all(&pool)
            .await?;

    Ok(Json(customers))
}

/// Create a customer.
///
/// # Request Body
///
/// ```json
/// { "id": 7, "cust_name": "Farhaan" }
/// ```
///
/// # Response
///
/// - **201 Created**: the inserted row
/// - **400**: malformed body
/// - **500**: duplicate id or other store failure
pub async fn create_customer(
    State(pool): State<DbPool>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let Json(request) = payload?;

    let customer = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (cust_id, cust_name) VALUES ($1, $2) RETURNING cust_id, cust_name",
    )
    .bind(request.id)
    .bind(request.cust_name)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_customer(
    State(pool): State<DbPool>,
    Path(cust_id): Path<i32>,
) -> Result<Json<Customer>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT cust_id, cust_name FROM customers WHERE cust_id = $1",
    )
    .bind(cust_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::CustomerNotFound)?;

    Ok(Json(customer))
}

/// Rename a customer.
///
/// # Request Body
///
/// ```json
/// { "name": "Farhaan K" }
/// ```
pub async fn update_customer(
    State(pool): State<DbPool>,
    Path(cust_id): Path<i32>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, AppError> {
    let Json(request) = payload?;

    let customer = sqlx::query_as::<_, Customer>(
        "UPDATE customers SET cust_name = $1 WHERE cust_id = $2 RETURNING cust_id, cust_name",
    )
    .bind(request.name)
    .bind(cust_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::CustomerNotFound)?;

    Ok(Json(customer))
}

/// Delete a customer.
///
/// Fails with 500 (foreign key violation) while orders or vouchers still
/// reference the customer.
pub async fn delete_customer(
    State(pool): State<DbPool>,
    Path(cust_id): Path<i32>,
) -> Result<Json<Customer>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(
        "DELETE FROM customers WHERE cust_id = $1 RETURNING cust_id, cust_name",
    )
    .bind(cust_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::CustomerNotFound)?;

    Ok(Json(customer))
}
