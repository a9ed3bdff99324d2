// tests/integration/api/auth_tests.rs

use crate::common::{app_helper::setup_app, auth_helper::*};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use staffing_backend::api::create_app;
use staffing_backend::domain::identity::CallerIdentity;
use staffing_backend::domain::primary_role::PrimaryRole;
use staffing_backend::error::AppResult;
use staffing_backend::logging::REQUEST_ID_HEADER;
use staffing_backend::repository::user_repository::UserRepository;
use staffing_backend::service::identity_service::IdentityProvider;
use std::collections::BTreeSet;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check_without_auth() {
    let (app, _state, _s, _db) = setup_app().await;

    let req = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _state, _s, _db) = setup_app().await;

    let req = Request::builder()
        .uri("/notifications")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_type"], "unauthorized");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let (app, _state, _s, _db) = setup_app().await;

    let req = create_authenticated_request("GET", "/notifications", "not-a-jwt", None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_unauthorized() {
    let (app, state, _s, _db) = setup_app().await;

    let token = token_for(&state, Uuid::new_v4());
    let req = create_authenticated_request("GET", "/notifications", &token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _state, _s, _db) = setup_app().await;

    let req = Request::builder()
        .uri("/health")
        .method("GET")
        .header(REQUEST_ID_HEADER, "req-12345")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
        "req-12345"
    );

    // 指定がなければ新しく採番される
    let req = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert!(res.headers().get(REQUEST_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_role_changes_apply_to_existing_tokens() {
    let (app, state, s, _db) = setup_app().await;
    let token = token_for(&state, s.pm.user_id);

    // トークン発行後に PM ロールを剥奪
    let revoked = UserRepository::revoke_primary_role(
        s.db.as_ref(),
        s.pm.user_id,
        PrimaryRole::ProjectManager,
    )
    .await
    .unwrap();
    assert!(revoked);

    let req = create_authenticated_request(
        "POST",
        "/proposals/allocation",
        &token,
        Some(json!({
            "project_id": s.project.id,
            "user_id": s.employee.id,
            "work_hours": 4
        })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_type"], "forbidden");
}

/// ロールを持たない識別情報を返す差し替え用プロバイダ
struct RolelessIdentityProvider {
    organization_id: Uuid,
}

#[async_trait]
impl IdentityProvider for RolelessIdentityProvider {
    async fn resolve(&self, user_id: Uuid) -> AppResult<CallerIdentity> {
        Ok(CallerIdentity {
            user_id,
            organization_id: Some(self.organization_id),
            department_id: None,
            primary_roles: BTreeSet::new(),
        })
    }
}

#[tokio::test]
async fn test_identity_provider_can_be_replaced() {
    let (_app, state, s, _db) = setup_app().await;
    let token = token_for(&state, s.pm.user_id);

    let state = state.with_identity_provider(Arc::new(RolelessIdentityProvider {
        organization_id: s.organization.id,
    }));
    let app = create_app(state);

    let req = create_authenticated_request(
        "POST",
        "/projects",
        &token,
        Some(json!({
            "name": "Shadow project",
            "period": "ongoing",
            "start_date": "2025-08-04"
        })),
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 主ロールなしでも空き状況検索は可能
    let req = create_authenticated_request("GET", "/employees/available", &token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
