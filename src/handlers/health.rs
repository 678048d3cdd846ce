//! Health check endpoint for service monitoring.

use crate::{db::DbPool, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    pub database: String,

    pub pool: PoolStats,

    pub timestamp: DateTime<Utc>,
}

/// Connection pool occupancy.
///
/// `idle` dropping permanently below `size` under no load means leases
/// are not being returned.
#[derive(Debug, Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
    pub max: u32,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "pool": { "size": 2, "idle": 2, "max": 10 },
///   "timestamp": "2025-09-12T10:28:14Z"
/// }
/// ```
///
/// If the database is unreachable the standard error response is returned.
pub async fn health_check(State(pool): State<DbPool>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        pool: PoolStats {
            size: pool.size(),
            idle: pool.num_idle(),
            max: pool.options().get_max_connections(),
        },
        timestamp: Utc::now(),
    }))
}
