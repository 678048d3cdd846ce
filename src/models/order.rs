//! Order data models and API request types.

use serde::{Deserialize, Serialize};

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Order {
    pub order_id: i32,
    pub customer_id: i32,
    pub product_name: String,
    pub quantity: i32,
}

/// Request body for creating an order directly, or placing one.
///
/// # JSON Example
///
/// ```json
/// {
///   "order_id": 105,
///   "customer_id": 5,
///   "product_name": "Sneakers",
///   "quantity": 3
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub order_id: i32,
    pub customer_id: i32,
    pub product_name: String,
    pub quantity: i32,
}

/// Request body for updating an order's product and quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub product_name: String,
    pub quantity: i32,
}
