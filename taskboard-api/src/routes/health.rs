/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/health
/// ```
///
/// # Response
///
/// Always 200 while the process is serving; `database` reports whether a
/// `SELECT 1` round trip succeeded.
///
/// ```json
/// {
///   "status": "success",
///   "data": { "version": "0.1.0", "database": "connected" },
///   "message": "API is running"
/// }
/// ```

use crate::{app::AppState, envelope::Envelope};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use taskboard_shared::db::pool::health_check as probe_database;

/// Health check payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Application version
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

pub async fn health_check(State(state): State<AppState>) -> Envelope<HealthResponse> {
    let database = match probe_database(&state.db).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            "disconnected"
        }
    };

    Envelope::ok(
        HealthResponse {
            version: taskboard_shared::VERSION.to_string(),
            database: database.to_string(),
        },
        "API is running",
    )
}
