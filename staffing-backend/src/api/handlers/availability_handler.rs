// staffing-backend/src/api/handlers/availability_handler.rs

use crate::api::dto::availability_dto::*;
use crate::api::dto::common::ApiResponse;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::json;

/// 空き状況で従業員を検索
pub async fn find_available_employees_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<Vec<AvailableEmployeeResponse>>>> {
    let employees = app_state
        .availability_service
        .find_available_employees(caller.identity(), query)
        .await?;
    let total = employees.len();

    Ok(Json(ApiResponse::success_with_metadata(
        "Available employees retrieved",
        employees,
        json!({ "total": total }),
    )))
}

pub fn availability_router(app_state: AppState) -> Router {
    Router::new()
        .route("/employees/available", get(find_available_employees_handler))
        .with_state(app_state)
}
