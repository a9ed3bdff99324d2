// tests/integration/proposals/listing_tests.rs

use crate::common::{self, db::TestDatabase, test_data::*};
use staffing_backend::api::dto::proposal_dto::CreateDeallocationProposalRequest;
use staffing_backend::domain::primary_role::PrimaryRole;
use staffing_backend::error::AppError;

#[tokio::test]
async fn test_department_listing_covers_all_members() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let s = Scenario::new(db.connection.clone()).await;
    let service = s.proposals();

    let colleague = s.add_employee().await;
    service
        .create_allocation_proposal(&s.pm, s.allocation_request(s.employee.id, 4))
        .await
        .unwrap();
    service
        .create_allocation_proposal(&s.pm, s.allocation_request(colleague.id, 2))
        .await
        .unwrap();

    let all = service
        .list_allocation_proposals_for_department(&s.manager)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let mine = service
        .list_allocation_proposals_for_user(&s.manager, colleague.id)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].user_id, colleague.id);
    assert_eq!(mine[0].work_hours, 2);
    assert_eq!(mine[0].role_ids, vec![s.role.id]);
    assert_eq!(mine[0].proposed_by, s.pm.user_id);
}

#[tokio::test]
async fn test_deallocation_listing() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let s = Scenario::new(db.connection.clone()).await;
    let service = s.proposals();

    s.allocate(s.employee.id, s.project.id, 4).await;
    service
        .create_deallocation_proposal(
            &s.pm,
            CreateDeallocationProposalRequest {
                project_id: s.project.id,
                user_id: s.employee.id,
                comment: Some("wrapping up".to_string()),
            },
        )
        .await
        .unwrap();

    let department = service
        .list_deallocation_proposals_for_department(&s.manager)
        .await
        .unwrap();
    assert_eq!(department.len(), 1);
    assert_eq!(department[0].reason.as_deref(), Some("wrapping up"));

    let user = service
        .list_deallocation_proposals_for_user(&s.manager, s.employee.id)
        .await
        .unwrap();
    assert_eq!(user.len(), 1);
    assert_eq!(user[0].project_id, s.project.id);
}

#[tokio::test]
async fn test_listing_is_limited_to_managers_department() {
    common::init_test_env();
    let db = TestDatabase::new().await;
    let s = Scenario::new(db.connection.clone()).await;
    let conn = s.db.as_ref();
    let service = s.proposals();

    // PM は一覧を見られない
    let err = service
        .list_allocation_proposals_for_department(&s.pm)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // 他部門のユーザーは見つからない扱い
    let other_dept = create_department(conn, s.organization.id, "Finance").await;
    let outsider = create_user(
        conn,
        Some(s.organization.id),
        Some(other_dept.id),
        &[PrimaryRole::Employee],
    )
    .await;
    let err = service
        .list_allocation_proposals_for_user(&s.manager, outsider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // 提案がなければ空
    let empty = service
        .list_deallocation_proposals_for_department(&s.manager)
        .await
        .unwrap();
    assert!(empty.is_empty());
}
