// staffing-backend/src/api/handlers/proposal_handler.rs

use crate::api::dto::common::ApiResponse;
use crate::api::dto::proposal_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::Caller;
use crate::utils::validation::handle_validation_error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// 配属提案を作成
pub async fn create_allocation_proposal_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateAllocationProposalRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProposalAcknowledgement>>)> {
    payload.validate().map_err(handle_validation_error)?;

    let ack = app_state
        .proposal_service
        .create_allocation_proposal(caller.identity(), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Allocation proposal sent to the department manager",
            ack,
        )),
    ))
}

/// 解除提案を作成
pub async fn create_deallocation_proposal_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateDeallocationProposalRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProposalAcknowledgement>>)> {
    payload.validate().map_err(handle_validation_error)?;

    let ack = app_state
        .proposal_service
        .create_deallocation_proposal(caller.identity(), payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Deallocation proposal sent to the department manager",
            ack,
        )),
    ))
}

pub async fn accept_allocation_proposal_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(proposal_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProposalDecisionResponse>>> {
    let decision = app_state
        .proposal_service
        .accept_allocation_proposal(caller.identity(), proposal_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Allocation proposal accepted",
        decision,
    )))
}

pub async fn reject_allocation_proposal_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(proposal_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProposalDecisionResponse>>> {
    let decision = app_state
        .proposal_service
        .reject_allocation_proposal(caller.identity(), proposal_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Allocation proposal rejected",
        decision,
    )))
}

pub async fn accept_deallocation_proposal_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(proposal_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProposalDecisionResponse>>> {
    let decision = app_state
        .proposal_service
        .accept_deallocation_proposal(caller.identity(), proposal_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Deallocation proposal accepted",
        decision,
    )))
}

pub async fn reject_deallocation_proposal_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(proposal_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProposalDecisionResponse>>> {
    let decision = app_state
        .proposal_service
        .reject_deallocation_proposal(caller.identity(), proposal_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Deallocation proposal rejected",
        decision,
    )))
}

/// 部門メンバー1人の配属提案一覧
pub async fn list_user_allocation_proposals_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<AllocationProposalResponse>>>> {
    let proposals = app_state
        .proposal_service
        .list_allocation_proposals_for_user(caller.identity(), user_id)
        .await?;
    let total = proposals.len();

    Ok(Json(ApiResponse::success_with_metadata(
        "Allocation proposals retrieved",
        proposals,
        json!({ "total": total }),
    )))
}

pub async fn list_department_allocation_proposals_handler(
    State(app_state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<Vec<AllocationProposalResponse>>>> {
    let proposals = app_state
        .proposal_service
        .list_allocation_proposals_for_department(caller.identity())
        .await?;
    let total = proposals.len();

    Ok(Json(ApiResponse::success_with_metadata(
        "Allocation proposals retrieved",
        proposals,
        json!({ "total": total }),
    )))
}

pub async fn list_user_deallocation_proposals_handler(
    State(app_state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<DeallocationProposalResponse>>>> {
    let proposals = app_state
        .proposal_service
        .list_deallocation_proposals_for_user(caller.identity(), user_id)
        .await?;
    let total = proposals.len();

    Ok(Json(ApiResponse::success_with_metadata(
        "Deallocation proposals retrieved",
        proposals,
        json!({ "total": total }),
    )))
}

pub async fn list_department_deallocation_proposals_handler(
    State(app_state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<ApiResponse<Vec<DeallocationProposalResponse>>>> {
    let proposals = app_state
        .proposal_service
        .list_deallocation_proposals_for_department(caller.identity())
        .await?;
    let total = proposals.len();

    Ok(Json(ApiResponse::success_with_metadata(
        "Deallocation proposals retrieved",
        proposals,
        json!({ "total": total }),
    )))
}

pub fn proposal_router(app_state: AppState) -> Router {
    Router::new()
        // 配属
        .route(
            "/proposals/allocation",
            post(create_allocation_proposal_handler),
        )
        .route(
            "/proposals/allocation/{id}/accept",
            post(accept_allocation_proposal_handler),
        )
        .route(
            "/proposals/allocation/{id}/reject",
            post(reject_allocation_proposal_handler),
        )
        .route(
            "/proposals/allocation/users/{user_id}",
            get(list_user_allocation_proposals_handler),
        )
        .route(
            "/proposals/allocation/department",
            get(list_department_allocation_proposals_handler),
        )
        // 解除
        .route(
            "/proposals/deallocation",
            post(create_deallocation_proposal_handler),
        )
        .route(
            "/proposals/deallocation/{id}/accept",
            post(accept_deallocation_proposal_handler),
        )
        .route(
            "/proposals/deallocation/{id}/reject",
            post(reject_deallocation_proposal_handler),
        )
        .route(
            "/proposals/deallocation/users/{user_id}",
            get(list_user_deallocation_proposals_handler),
        )
        .route(
            "/proposals/deallocation/department",
            get(list_department_deallocation_proposals_handler),
        )
        .with_state(app_state)
}
