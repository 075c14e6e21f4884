use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable or behind on migrations.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// `None` when the migration table could not be read.
    pub migrations: Option<MigrationsHealth>,
    pub pool: PoolHealth,
}

#[derive(Serialize)]
pub struct MigrationsHealth {
    pub applied: i64,
    pub expected: i64,
    pub current: bool,
}

#[derive(Serialize)]
pub struct PoolHealth {
    pub size: u32,
    pub idle: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = crmboard_db::health_check(&state.pool).await.is_ok();
    let migrations = match crmboard_db::migration_status(&state.pool).await {
        Ok(m) => Some(MigrationsHealth {
            applied: m.applied,
            expected: m.expected,
            current: m.is_current(),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read migration status");
            None
        }
    };

    let current = migrations.as_ref().is_some_and(|m| m.current);
    let status = if db_healthy && current { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        migrations,
        pool: PoolHealth {
            size: state.pool.size(),
            idle: state.pool.num_idle(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
