//! `GET /health`: liveness plus database and schema state.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database is reachable and fully migrated, else `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Every embedded migration has been applied.
    pub schema_current: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = yamdb_db::health_check(&state.pool).await.is_ok();
    let schema_current = match yamdb_db::pending_migrations(&state.pool).await {
        Ok(0) => true,
        Ok(pending) => {
            tracing::warn!(pending, "Database schema is behind the embedded migrations");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not read migration state");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy && schema_current { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema_current,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
