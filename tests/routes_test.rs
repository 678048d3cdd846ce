mod common;

use std::{collections::HashMap, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use common::{Event, Script, ScriptedStore, fk_violation, row};
use customer_orders_api::{
    app::{crud_routes, transactional_routes},
    unit_of_work::{Row, UnitOfWorkExecutor},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(store: &ScriptedStore) -> Router {
    transactional_routes(UnitOfWorkExecutor::new(store.clone(), Duration::from_secs(5)))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, "POST", uri, body).await
}

async fn send_json(app: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn asha_payload() -> Value {
    json!({
        "cust_id": 10,
        "cust_name": "Asha",
        "voucher_id": 1,
        "voucher_name": "WELCOME10",
        "expiry": "2026-01-01"
    })
}

fn asha_rows() -> HashMap<String, Vec<Row>> {
    let mut rows = HashMap::new();
    rows.insert(
        "customer".to_string(),
        vec![row(json!({ "cust_id": 10, "cust_name": "Asha" }))],
    );
    rows.insert(
        "voucher".to_string(),
        vec![row(json!({
            "voucher_id": 1,
            "cust_id": 10,
            "voucher_name": "WELCOME10",
            "expiry": "2026-01-01"
        }))],
    );
    rows
}

#[tokio::test]
async fn test_welcome_voucher_returns_both_rows() {
    let store = ScriptedStore::new(Script {
        rows: asha_rows(),
        ..Script::default()
    });

    let (status, body) = post_json(app(&store), "/welcome-voucher", asha_payload()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "customer": { "cust_id": 10, "cust_name": "Asha" },
            "voucher": {
                "voucher_id": 1,
                "cust_id": 10,
                "voucher_name": "WELCOME10",
                "expiry": "2026-01-01"
            }
        })
    );
    assert_eq!(store.executed_steps(), vec!["customer", "voucher"]);
    assert_eq!(store.count(&Event::Commit), 1);
    assert_eq!(store.outstanding(), 0);
}

#[tokio::test]
async fn test_welcome_voucher_foreign_key_failure_is_single_error() {
    let store = ScriptedStore::new(Script {
        rows: asha_rows(),
        fail_step: Some(("voucher".to_string(), fk_violation())),
        ..Script::default()
    });

    let (status, body) = post_json(app(&store), "/welcome-voucher", asha_payload()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "23503");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("violates foreign key constraint")
    );
    assert!(body.get("customer").is_none());
    assert_eq!(store.count(&Event::Rollback), 1);
    assert_eq!(store.count(&Event::Commit), 0);
    assert_eq!(store.outstanding(), 0);
}

#[tokio::test]
async fn test_welcome_voucher_accepts_short_field_names() {
    let store = ScriptedStore::default();

    let (status, _) = post_json(
        app(&store),
        "/welcome-voucher",
        json!({
            "id": 10,
            "cust_name": "Asha",
            "voucher_id": 1,
            "name": "WELCOME10",
            "date": "2026-01-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_missing_field_is_rejected_before_touching_the_store() {
    let store = ScriptedStore::default();

    let (status, body) = post_json(
        app(&store),
        "/welcome-voucher",
        json!({ "cust_id": 10, "cust_name": "Asha" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn test_place_order_returns_customer_and_order() {
    let store = ScriptedStore::default();

    let (status, body) = post_json(
        app(&store),
        "/place-order",
        json!({
            "order_id": 105,
            "customer_id": 5,
            "product_name": "Sneakers",
            "quantity": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "customer": { "step": "customer" }, "order": { "step": "order" } })
    );
    assert_eq!(store.executed_steps(), vec!["customer", "order"]);
}

#[tokio::test]
async fn test_place_order_for_unknown_customer_rolls_back() {
    let mut rows = HashMap::new();
    rows.insert("customer".to_string(), Vec::new());
    let store = ScriptedStore::new(Script {
        rows,
        ..Script::default()
    });

    let (status, body) = post_json(
        app(&store),
        "/place-order",
        json!({
            "order_id": 106,
            "customer_id": 999,
            "product_name": "Sneakers",
            "quantity": 1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "step 'customer' returned no rows" }));
    assert_eq!(store.executed_steps(), vec!["customer"]);
    assert_eq!(store.count(&Event::Rollback), 1);
}

#[tokio::test]
async fn test_place_order_rejects_non_positive_quantity() {
    let store = ScriptedStore::default();

    let (status, body) = post_json(
        app(&store),
        "/place-order",
        json!({
            "order_id": 107,
            "customer_id": 5,
            "product_name": "Sneakers",
            "quantity": 0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request: Quantity must be positive" }));
    assert!(store.events().is_empty());
}

#[tokio::test]
async fn test_order_update_rejects_non_positive_quantity() {
    // never connects: the request must be rejected first
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:1/unreachable")
        .unwrap();

    let (status, body) = send_json(
        crud_routes(pool.clone()),
        "PUT",
        "/orders/105",
        json!({ "product_name": "Sneakers", "quantity": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request: Quantity must be positive" }));
    assert_eq!(pool.size(), 0);
}
