// tests/integration/api/workflow_api_tests.rs

use crate::common::{app_helper::*, auth_helper::*, test_data::*};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use staffing_backend::config::AppConfig;
use staffing_backend::domain::primary_role::PrimaryRole;

#[tokio::test]
async fn test_allocation_workflow_over_http() {
    let (app, state, s, _db) = setup_app().await;
    let pm_token = token_for(&state, s.pm.user_id);
    let manager_token = token_for(&state, s.manager.user_id);

    // 提案の作成
    let payload = json!({
        "project_id": s.project.id,
        "user_id": s.employee.id,
        "work_hours": 6,
        "role_ids": [s.role.id],
        "comment": "backend capacity"
    });
    let req = create_authenticated_request(
        "POST",
        "/proposals/allocation",
        &pm_token,
        Some(payload.clone()),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["kind"], "allocation");
    assert_eq!(body["data"]["awaiting_approver"], s.manager.user_id.to_string());
    let proposal_id = body["data"]["proposal_id"].as_str().unwrap().to_string();

    // 重複
    let req = create_authenticated_request(
        "POST",
        "/proposals/allocation",
        &pm_token,
        Some(payload),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");

    // マネージャーが通知を受け取る
    let req = create_authenticated_request(
        "GET",
        "/notifications/poll?timeout_secs=1",
        &manager_token,
        None,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let delivered = body["data"].as_array().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0]["notification_type"], "ALLOCATION");

    // 部門の提案一覧
    let req = create_authenticated_request(
        "GET",
        "/proposals/allocation/department",
        &manager_token,
        None,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total"], 1);

    // PM は承認できない
    let uri = format!("/proposals/allocation/{}/accept", proposal_id);
    let req = create_authenticated_request("POST", &uri, &pm_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_type"], "forbidden");

    // 承認
    let req = create_authenticated_request("POST", &uri, &manager_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "accepted");

    // 二重承認は見つからない
    let req = create_authenticated_request("POST", &uri, &manager_token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(work_hours(s.db.as_ref(), s.employee.id, s.project.id).await, Some(6));

    // 空き状況検索に反映される
    let req = create_authenticated_request(
        "GET",
        "/employees/available?partially_available=true",
        &pm_token,
        None,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let employees = body["data"].as_array().unwrap();
    let employee = employees
        .iter()
        .find(|e| e["id"] == s.employee.id.to_string())
        .unwrap();
    assert_eq!(employee["work_hours"], 6);
    assert_eq!(employee["method"], json!(["partially_available"]));
}

#[tokio::test]
async fn test_deallocation_workflow_over_http() {
    let (app, state, s, _db) = setup_app().await;
    s.allocate(s.employee.id, s.project.id, 4).await;
    let pm_token = token_for(&state, s.pm.user_id);
    let manager_token = token_for(&state, s.manager.user_id);

    let req = create_authenticated_request(
        "POST",
        "/proposals/deallocation",
        &pm_token,
        Some(json!({
            "project_id": s.project.id,
            "user_id": s.employee.id,
            "comment": "moving to another team"
        })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let proposal_id = body["data"]["proposal_id"].as_str().unwrap().to_string();

    let uri = format!("/proposals/deallocation/users/{}", s.employee.id);
    let req = create_authenticated_request("GET", &uri, &manager_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["reason"], "moving to another team");

    let uri = format!("/proposals/deallocation/{}/accept", proposal_id);
    let req = create_authenticated_request("POST", &uri, &manager_token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    assert!(!is_member(s.db.as_ref(), s.employee.id, s.project.id).await);
    assert!(is_deallocated(s.db.as_ref(), s.employee.id, s.project.id).await);
}

#[tokio::test]
async fn test_lenient_rejection_over_http() {
    let mut config = AppConfig::for_testing();
    config.workflow.strict_rejection = false;
    let (app, state, s, _db) = setup_app_with_config(config).await;
    let pm_token = token_for(&state, s.pm.user_id);

    let req = create_authenticated_request(
        "POST",
        "/proposals/allocation",
        &pm_token,
        Some(json!({
            "project_id": s.project.id,
            "user_id": s.employee.id,
            "work_hours": 3
        })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let proposal_id = body["data"]["proposal_id"].as_str().unwrap().to_string();

    let uri = format!("/proposals/allocation/{}/reject", proposal_id);
    let req = create_authenticated_request("POST", &uri, &pm_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "rejected");
}

#[tokio::test]
async fn test_request_validation_errors() {
    let (app, state, s, _db) = setup_app().await;
    let pm_token = token_for(&state, s.pm.user_id);

    // 工数の範囲外
    let req = create_authenticated_request(
        "POST",
        "/proposals/allocation",
        &pm_token,
        Some(json!({
            "project_id": s.project.id,
            "user_id": s.employee.id,
            "work_hours": 12
        })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // 締切ウィンドウなしの close_to_finish
    let req = create_authenticated_request(
        "GET",
        "/employees/available?close_to_finish=true",
        &pm_token,
        None,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_project_management_over_http() {
    let (app, state, s, _db) = setup_app().await;
    let pm_token = token_for(&state, s.pm.user_id);
    let employee_token = token_for(&state, s.employee.id);
    let today = Utc::now().date_naive();

    let payload = json!({
        "name": "Data platform",
        "description": "Warehouse migration",
        "period": "fixed",
        "start_date": today,
        "deadline_date": today + Duration::days(30),
        "role_ids": [s.role.id]
    });

    let req = create_authenticated_request(
        "POST",
        "/projects",
        &employee_token,
        Some(payload.clone()),
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = create_authenticated_request("POST", "/projects", &pm_token, Some(payload));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["period"], "fixed");
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = create_authenticated_request(
        "PATCH",
        &format!("/projects/{}", project_id),
        &pm_token,
        Some(json!({ "status": "in_progress", "name": "Data platform v2" })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in_progress");
    assert_eq!(body["data"]["name"], "Data platform v2");

    let role = create_custom_role(s.db.as_ref(), s.organization.id, "Analyst").await;
    let req = create_authenticated_request(
        "POST",
        &format!("/projects/{}/roles/{}", project_id, role.id),
        &pm_token,
        None,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["attached"], true);
}

#[tokio::test]
async fn test_technology_stack_and_project_deletion_over_http() {
    let (app, state, s, _db) = setup_app().await;
    let pm_token = token_for(&state, s.pm.user_id);
    let admin = create_user(
        s.db.as_ref(),
        Some(s.organization.id),
        None,
        &[PrimaryRole::Employee, PrimaryRole::OrganizationAdmin],
    )
    .await;
    let admin_token = token_for(&state, admin.id);

    let req = create_authenticated_request(
        "POST",
        "/technologies",
        &admin_token,
        Some(json!({ "name": "PostgreSQL" })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let technology_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = create_authenticated_request(
        "POST",
        "/technologies",
        &admin_token,
        Some(json!({ "name": "PostgreSQL" })),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");

    let req = create_authenticated_request("GET", "/technologies", &pm_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let assignment = format!("/projects/{}/technologies/{}", s.project.id, technology_id);
    let req = create_authenticated_request("POST", &assignment, &pm_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], true);

    let req = create_authenticated_request(
        "GET",
        &format!("/projects/{}/technologies", s.project.id),
        &pm_token,
        None,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "PostgreSQL");

    let req = create_authenticated_request("DELETE", &assignment, &pm_token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let req = create_authenticated_request("DELETE", &assignment, &pm_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");

    // プロジェクト削除
    let project_uri = format!("/projects/{}", s.project.id);
    let req = create_authenticated_request("DELETE", &project_uri, &admin_token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = create_authenticated_request("DELETE", &project_uri, &pm_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["affected"], true);

    let req = create_authenticated_request("DELETE", &project_uri, &pm_token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_list_and_delete_over_http() {
    let (app, state, s, _db) = setup_app().await;
    let manager_token = token_for(&state, s.manager.user_id);

    s.proposals()
        .create_allocation_proposal(&s.pm, s.allocation_request(s.employee.id, 2))
        .await
        .unwrap();

    let req = create_authenticated_request("GET", "/notifications", &manager_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["sent"], false);
    let id = notifications[0]["id"].as_str().unwrap().to_string();

    let uri = format!("/notifications/{}", id);
    let req = create_authenticated_request("DELETE", &uri, &manager_token, None);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["affected"], true);

    let req = create_authenticated_request("DELETE", &uri, &manager_token, None);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
