//! HTTP router construction.
//!
//! CRUD routes share the pool directly; the transactional routes share a
//! [`UnitOfWorkExecutor`] and are generic over the store so they can run
//! against a test double.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::DbPool,
    handlers,
    unit_of_work::{Store, UnitOfWorkExecutor},
};

/// Full application router.
pub fn router(pool: DbPool, executor: UnitOfWorkExecutor<DbPool>) -> Router {
    Router::new()
        .merge(crud_routes(pool))
        .merge(transactional_routes(executor))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Single-statement routes backed by the pool.
pub fn crud_routes(pool: DbPool) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/{order_id}",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route("/vouchers", get(handlers::vouchers::list_vouchers))
        .with_state(pool)
}

/// Routes that run a unit of work per request.
pub fn transactional_routes<S>(executor: UnitOfWorkExecutor<S>) -> Router
where
    S: Store + Clone + 'static,
{
    Router::new()
        .route(
            "/welcome-voucher",
            post(handlers::vouchers::welcome_voucher::<S>),
        )
        .route("/place-order", post(handlers::orders::place_order::<S>))
        .with_state(executor)
}
