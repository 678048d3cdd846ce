//! Customer data models and API request types.

use serde::{Deserialize, Serialize};

/// A row of the `customers` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Customer {
    pub cust_id: i32,
    pub cust_name: String,
}

/// Request body for creating a customer.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 7,
///   "cust_name": "Farhaan"
/// }
/// ```
///
/// `cust_id` and `name` are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(alias = "cust_id")]
    pub id: i32,

    #[serde(alias = "name")]
    pub cust_name: String,
}

/// Request body for renaming a customer.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(alias = "cust_name")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_both_payload_shapes() {
        let a: CreateCustomerRequest =
            serde_json::from_str(r#"{"id": 7, "cust_name": "Farhaan"}"#).unwrap();
        let b: CreateCustomerRequest =
            serde_json::from_str(r#"{"cust_id": 7, "name": "Farhaan"}"#).unwrap();

        assert_eq!((a.id, a.cust_name.as_str()), (7, "Farhaan"));
        assert_eq!((b.id, b.cust_name.as_str()), (7, "Farhaan"));
    }

    #[test]
    fn create_request_requires_an_id() {
        assert!(serde_json::from_str::<CreateCustomerRequest>(r#"{"cust_name": "Sujal"}"#).is_err());
    }
}
