// tests/integration/projects/project_tests.rs

use crate::common::{self, db::TestDatabase, test_data::*};
use chrono::{Duration, Utc};
use staffing_backend::api::dto::project_dto::{
    CreateProjectRequest, CreateTechnologyRequest, UpdateProjectRequest,
};
use staffing_backend::domain::identity::CallerIdentity;
use staffing_backend::domain::primary_role::PrimaryRole;
use staffing_backend::domain::project_status::{ProjectPeriod, ProjectStatus};
use staffing_backend::error::AppError;
use staffing_backend::repository::project_repository::ProjectRepository;
use staffing_backend::service::project_service::ProjectService;
use uuid::Uuid;

async fn setup() -> (Scenario, ProjectService, TestDatabase) {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let scenario = Scenario::new(db.connection.clone()).await;
    let service = ProjectService::new(db.connection.clone());
    (scenario, service, db)
}

async fn organization_admin(s: &Scenario, organization_id: Uuid) -> CallerIdentity {
    let admin = create_user(
        s.db.as_ref(),
        Some(organization_id),
        None,
        &[PrimaryRole::Employee, PrimaryRole::OrganizationAdmin],
    )
    .await;
    identity_of(&s.db, admin.id).await
}

fn technology(name: &str) -> CreateTechnologyRequest {
    CreateTechnologyRequest {
        name: name.to_string(),
    }
}

fn fixed_request(role_ids: Vec<Uuid>) -> CreateProjectRequest {
    let today = Utc::now().date_naive();
    CreateProjectRequest {
        name: "Billing revamp".to_string(),
        description: "Replace the invoicing pipeline".to_string(),
        period: ProjectPeriod::Fixed,
        start_date: today,
        deadline_date: Some(today + Duration::days(60)),
        status: None,
        role_ids,
    }
}

#[tokio::test]
async fn test_create_fixed_project_with_roles() {
    let (s, service, _db) = setup().await;

    let project = service
        .create_project(&s.pm, fixed_request(vec![s.role.id, s.role.id]))
        .await
        .unwrap();

    assert_eq!(project.organization_id, s.organization.id);
    assert_eq!(project.period, "fixed");
    assert_eq!(project.status, ProjectStatus::NotStarted.as_str());
    // 重複したロールは1件にまとめられる
    assert_eq!(project.role_ids, vec![s.role.id]);
}

#[tokio::test]
async fn test_create_project_validates_schedule() {
    let (s, service, _db) = setup().await;

    // 締切なしの Fixed
    let mut request = fixed_request(vec![]);
    request.deadline_date = None;
    let err = service.create_project(&s.pm, request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // 締切ありの Ongoing
    let mut request = fixed_request(vec![]);
    request.period = ProjectPeriod::Ongoing;
    let err = service.create_project(&s.pm, request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // 開始より前の締切
    let mut request = fixed_request(vec![]);
    request.deadline_date = Some(request.start_date - Duration::days(1));
    let err = service.create_project(&s.pm, request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    // 作成時に完了済みは不可
    let mut request = fixed_request(vec![]);
    request.status = Some(ProjectStatus::Closed);
    let err = service.create_project(&s.pm, request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_create_project_requires_project_manager() {
    let (s, service, _db) = setup().await;
    let employee = identity_of(&s.db, s.employee.id).await;

    let err = service
        .create_project(&employee, fixed_request(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_foreign_role_is_not_found() {
    let (s, service, _db) = setup().await;
    let other = create_organization(s.db.as_ref(), "Umbrella").await;
    let foreign = create_custom_role(s.db.as_ref(), other.id, "QA").await;

    let err = service
        .create_project(&s.pm, fixed_request(vec![foreign.id]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service
        .attach_custom_role(&s.pm, s.project.id, foreign.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_project_switches_to_ongoing() {
    let (s, service, _db) = setup().await;

    let updated = service
        .update_project(
            &s.pm,
            s.project.id,
            UpdateProjectRequest {
                period: Some(ProjectPeriod::Ongoing),
                status: Some(ProjectStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.period, "ongoing");
    assert_eq!(updated.deadline_date, None);
    assert_eq!(updated.role_ids, vec![s.role.id]);

    // Ongoing に締切は付けられない
    let err = service
        .update_project(
            &s.pm,
            s.project.id,
            UpdateProjectRequest {
                deadline_date: Some(Utc::now().date_naive() + Duration::days(5)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_update_project_in_other_organization_is_forbidden() {
    let (s, service, _db) = setup().await;
    let conn = s.db.as_ref();
    let other = create_organization(conn, "Hooli").await;
    let foreign_pm = create_user(
        conn,
        Some(other.id),
        None,
        &[PrimaryRole::Employee, PrimaryRole::ProjectManager],
    )
    .await;
    let foreign_pm = identity_of(&s.db, foreign_pm.id).await;

    let err = service
        .update_project(
            &foreign_pm,
            s.project.id,
            UpdateProjectRequest {
                name: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = service
        .update_project(&s.pm, Uuid::new_v4(), UpdateProjectRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_attach_custom_role_is_idempotent() {
    let (s, service, _db) = setup().await;
    let tester = create_custom_role(s.db.as_ref(), s.organization.id, "Tester").await;

    let first = service
        .attach_custom_role(&s.pm, s.project.id, tester.id)
        .await
        .unwrap();
    assert!(first.attached);

    let second = service
        .attach_custom_role(&s.pm, s.project.id, tester.id)
        .await
        .unwrap();
    assert!(!second.attached);

    // 紐付けたロールは配属提案で使える
    let mut request = s.allocation_request(s.employee.id, 3);
    request.role_ids = vec![tester.id];
    s.proposals()
        .create_allocation_proposal(&s.pm, request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_project_cascades_workflow_rows() {
    let (s, service, _db) = setup().await;
    let conn = s.db.as_ref();

    // 配属済みメンバー（ロール付き）と保留中の提案を用意
    let proposals = s.proposals();
    let ack = proposals
        .create_allocation_proposal(&s.pm, s.allocation_request(s.employee.id, 5))
        .await
        .unwrap();
    proposals
        .accept_allocation_proposal(&s.manager, ack.proposal_id)
        .await
        .unwrap();
    let pending = s.add_employee().await;
    proposals
        .create_allocation_proposal(&s.pm, s.allocation_request(pending.id, 2))
        .await
        .unwrap();

    let admin = organization_admin(&s, s.organization.id).await;
    let rust = service.create_technology(&admin, technology("Rust")).await.unwrap();
    service
        .assign_technology(&s.pm, s.project.id, rust.id)
        .await
        .unwrap();

    service.delete_project(&s.pm, s.project.id).await.unwrap();

    assert!(ProjectRepository::find_by_id(conn, s.project.id)
        .await
        .unwrap()
        .is_none());
    assert!(!is_member(conn, s.employee.id, s.project.id).await);
    assert_eq!(work_hours(conn, s.employee.id, s.project.id).await, None);
    assert!(bound_roles(conn, s.employee.id, s.project.id).await.is_empty());
    assert_eq!(allocation_proposal_count(conn, pending.id, s.project.id).await, 0);
    assert!(notifications_for(conn, s.manager.user_id).await.is_empty());

    // 技術自体は組織に残る
    let technologies = service.list_technologies(&s.pm).await.unwrap();
    assert_eq!(technologies.len(), 1);
    assert_eq!(technologies[0].id, rust.id);
}

#[tokio::test]
async fn test_delete_project_requires_project_manager_in_same_organization() {
    let (s, service, _db) = setup().await;
    let conn = s.db.as_ref();

    let employee = identity_of(&s.db, s.employee.id).await;
    let err = service
        .delete_project(&employee, s.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let other = create_organization(conn, "Hooli").await;
    let foreign_pm = create_user(
        conn,
        Some(other.id),
        None,
        &[PrimaryRole::Employee, PrimaryRole::ProjectManager],
    )
    .await;
    let foreign_pm = identity_of(&s.db, foreign_pm.id).await;
    let err = service
        .delete_project(&foreign_pm, s.project.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = service
        .delete_project(&s.pm, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(ProjectRepository::find_by_id(conn, s.project.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_technology_catalogue_and_assignment() {
    let (s, service, _db) = setup().await;
    let admin = organization_admin(&s, s.organization.id).await;

    let rust = service.create_technology(&admin, technology("Rust")).await.unwrap();
    service.create_technology(&admin, technology("Go")).await.unwrap();
    assert_eq!(rust.organization_id, s.organization.id);

    // 同名は組織内で重複不可
    let err = service
        .create_technology(&admin, technology("Rust"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // 登録は組織管理者のみ
    let err = service
        .create_technology(&s.pm, technology("Elixir"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let names: Vec<String> = service
        .list_technologies(&s.pm)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Go".to_string(), "Rust".to_string()]);

    let first = service
        .assign_technology(&s.pm, s.project.id, rust.id)
        .await
        .unwrap();
    assert!(first.changed);
    let second = service
        .assign_technology(&s.pm, s.project.id, rust.id)
        .await
        .unwrap();
    assert!(!second.changed);

    let assigned = service
        .list_project_technologies(&s.pm, s.project.id)
        .await
        .unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, rust.id);

    let removed = service
        .unassign_technology(&s.pm, s.project.id, rust.id)
        .await
        .unwrap();
    assert!(removed.changed);

    // 割り当てのない技術は外せない
    let err = service
        .unassign_technology(&s.pm, s.project.id, rust.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(service
        .list_project_technologies(&s.pm, s.project.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_technology_assignment_is_scoped_to_organization() {
    let (s, service, _db) = setup().await;
    let conn = s.db.as_ref();

    let other = create_organization(conn, "Hooli").await;
    let foreign_admin = organization_admin(&s, other.id).await;
    let foreign_tech = service
        .create_technology(&foreign_admin, technology("Rust"))
        .await
        .unwrap();

    // 他組織の技術は存在しないものとして扱う
    let err = service
        .assign_technology(&s.pm, s.project.id, foreign_tech.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let admin = organization_admin(&s, s.organization.id).await;
    let rust = service.create_technology(&admin, technology("Rust")).await.unwrap();

    let foreign_pm = create_user(
        conn,
        Some(other.id),
        None,
        &[PrimaryRole::Employee, PrimaryRole::ProjectManager],
    )
    .await;
    let foreign_pm = identity_of(&s.db, foreign_pm.id).await;
    let err = service
        .assign_technology(&foreign_pm, s.project.id, rust.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let employee = identity_of(&s.db, s.employee.id).await;
    let err = service
        .assign_technology(&employee, s.project.id, rust.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // 組織ごとの一覧は互いに見えない
    assert_eq!(service.list_technologies(&foreign_admin).await.unwrap().len(), 1);
    assert_eq!(service.list_technologies(&s.pm).await.unwrap().len(), 1);
}
