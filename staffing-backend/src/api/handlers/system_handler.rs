// staffing-backend/src/api/handlers/system_handler.rs

use crate::api::dto::common::ApiResponse;
use crate::api::AppState;
use crate::error::AppResult;
use axum::{extract::State, routing::get, Json, Router};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub database: bool,
}

/// 死活監視
pub async fn health_handler(
    State(app_state): State<AppState>,
) -> AppResult<Json<ApiResponse<HealthResponse>>> {
    let database = app_state
        .db
        .execute_unprepared("SELECT 1")
        .await
        .is_ok();

    Ok(Json(ApiResponse::success(
        "Service is running",
        HealthResponse {
            status: if database { "ok" } else { "degraded" }.to_string(),
            environment: app_state.config.environment.clone(),
            database,
        },
    )))
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
