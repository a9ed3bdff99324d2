// staffing-backend/src/api/handlers/project_handler.rs

use crate::api::dto::common::{ApiResponse, OperationResult};
use crate::api::dto::project_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::utils::validation::handle_validation_error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

/// プロジェクト作成
pub async fn create_project_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProjectResponse>>)> {
    payload.validate().map_err(handle_validation_error)?;

    let project = app_state
        .project_service
        .create_project(caller.identity(), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Project created successfully", project)),
    ))
}

/// プロジェクト更新
pub async fn update_project_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> AppResult<Json<ApiResponse<ProjectResponse>>> {
    payload.validate().map_err(handle_validation_error)?;

    let project = app_state
        .project_service
        .update_project(caller.identity(), project_id, payload)
        .await?;

    Ok(Json(ApiResponse::success(
        "Project updated successfully",
        project,
    )))
}

/// カスタムロールの紐付け
pub async fn attach_custom_role_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path((project_id, role_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<CustomRoleAttachmentResponse>>> {
    let result = app_state
        .project_service
        .attach_custom_role(caller.identity(), project_id, role_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Custom role attached to project",
        result,
    )))
}

/// プロジェクト削除
pub async fn delete_project_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OperationResult>>> {
    app_state
        .project_service
        .delete_project(caller.identity(), project_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Project deleted successfully",
        OperationResult {
            id: project_id,
            affected: true,
        },
    )))
}

/// 技術の登録
pub async fn create_technology_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateTechnologyRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TechnologyResponse>>)> {
    payload.validate().map_err(handle_validation_error)?;

    let technology = app_state
        .project_service
        .create_technology(caller.identity(), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Technology registered", technology)),
    ))
}

pub async fn list_technologies_handler(
    State(app_state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<Vec<TechnologyResponse>>>> {
    let technologies = app_state
        .project_service
        .list_technologies(caller.identity())
        .await?;

    Ok(Json(ApiResponse::success(
        "Technologies retrieved",
        technologies,
    )))
}

pub async fn list_project_technologies_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<TechnologyResponse>>>> {
    let technologies = app_state
        .project_service
        .list_project_technologies(caller.identity(), project_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Project technologies retrieved",
        technologies,
    )))
}

/// 技術の割り当て
pub async fn assign_technology_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path((project_id, technology_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<TechnologyAssignmentResponse>>> {
    let result = app_state
        .project_service
        .assign_technology(caller.identity(), project_id, technology_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Technology assigned to project",
        result,
    )))
}

/// 技術の割り当て解除
pub async fn unassign_technology_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path((project_id, technology_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<TechnologyAssignmentResponse>>> {
    let result = app_state
        .project_service
        .unassign_technology(caller.identity(), project_id, technology_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Technology removed from project",
        result,
    )))
}

pub fn project_router(app_state: AppState) -> Router {
    Router::new()
        .route("/projects", post(create_project_handler))
        .route(
            "/projects/{id}",
            patch(update_project_handler).delete(delete_project_handler),
        )
        .route(
            "/projects/{id}/roles/{role_id}",
            post(attach_custom_role_handler),
        )
        .route(
            "/projects/{id}/technologies",
            get(list_project_technologies_handler),
        )
        .route(
            "/projects/{id}/technologies/{technology_id}",
            post(assign_technology_handler).delete(unassign_technology_handler),
        )
        .route(
            "/technologies",
            post(create_technology_handler).get(list_technologies_handler),
        )
        .with_state(app_state)
}
