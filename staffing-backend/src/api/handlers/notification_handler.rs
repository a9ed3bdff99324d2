// staffing-backend/src/api/handlers/notification_handler.rs

use crate::api::dto::common::{ApiResponse, OperationResult};
use crate::api::dto::notification_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use std::time::Duration;
use uuid::Uuid;

/// 自分宛ての通知一覧（取得と同時に送信済みにする）
pub async fn list_notifications_handler(
    State(app_state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<Vec<NotificationResponse>>>> {
    let notifications = app_state
        .notification_service
        .list_notifications(caller.identity())
        .await?;

    Ok(Json(ApiResponse::success(
        "Notifications retrieved",
        notifications,
    )))
}

/// 未送信通知のロングポーリング
pub async fn poll_notifications_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Query(query): Query<PollQuery>,
) -> AppResult<Json<ApiResponse<Vec<NotificationResponse>>>> {
    let notifications = app_state
        .notification_service
        .poll_notifications(
            caller.identity(),
            query.timeout_secs.map(Duration::from_secs),
        )
        .await?;

    Ok(Json(ApiResponse::success(
        "Notifications polled",
        notifications,
    )))
}

pub async fn delete_notification_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OperationResult>>> {
    app_state
        .notification_service
        .delete_notification(caller.identity(), notification_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Notification deleted",
        OperationResult {
            id: notification_id,
            affected: true,
        },
    )))
}

pub fn notification_router(app_state: AppState) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/poll", get(poll_notifications_handler))
        .route("/notifications/{id}", delete(delete_notification_handler))
        .with_state(app_state)
}
