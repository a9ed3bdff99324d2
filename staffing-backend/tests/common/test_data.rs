// tests/common/test_data.rs

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use staffing_backend::api::dto::proposal_dto::CreateAllocationProposalRequest;
use staffing_backend::config::WorkflowConfig;
use staffing_backend::domain::identity::CallerIdentity;
use staffing_backend::domain::primary_role::PrimaryRole;
use staffing_backend::domain::project_status::{ProjectPeriod, ProjectStatus};
use staffing_backend::domain::{
    allocation_proposal_model, custom_role_model, deallocation_proposal_model, department_model,
    notification_model, organization_model, project_custom_role_model, project_model, user_model,
};
use staffing_backend::repository::{
    custom_role_repository::CustomRoleRepository, project_repository::ProjectRepository,
    user_repository::UserRepository, work_hour_repository::WorkHourRepository,
};
use staffing_backend::service::identity_service::{DirectoryIdentityProvider, IdentityProvider};
use staffing_backend::service::proposal_service::ProposalService;
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_organization(db: &DatabaseConnection, name: &str) -> organization_model::Model {
    organization_model::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_department(
    db: &DatabaseConnection,
    organization_id: Uuid,
    name: &str,
) -> department_model::Model {
    department_model::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        organization_id: Set(organization_id),
        manager_id: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn set_department_manager(
    db: &DatabaseConnection,
    department_id: Uuid,
    manager_id: Uuid,
) {
    department_model::ActiveModel {
        id: Set(department_id),
        manager_id: Set(Some(manager_id)),
        ..Default::default()
    }
    .update(db)
    .await
    .unwrap();
}

pub async fn create_user(
    db: &DatabaseConnection,
    organization_id: Option<Uuid>,
    department_id: Option<Uuid>,
    roles: &[PrimaryRole],
) -> user_model::Model {
    let suffix = Uuid::new_v4().simple().to_string();
    let user = user_model::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(format!("user_{}", &suffix[..12])),
        email: Set(format!("{}@example.com", suffix)),
        organization_id: Set(organization_id),
        department_id: Set(department_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();

    for role in roles {
        UserRepository::grant_primary_role(db, user.id, *role)
            .await
            .unwrap();
    }

    user
}

pub async fn create_project(
    db: &DatabaseConnection,
    organization_id: Uuid,
    period: ProjectPeriod,
    deadline_date: Option<NaiveDate>,
) -> project_model::Model {
    let now = Utc::now();
    project_model::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        name: Set(format!("Project {}", &Uuid::new_v4().simple().to_string()[..6])),
        description: Set("seeded project".to_string()),
        period: Set(period.as_str().to_string()),
        start_date: Set(now.date_naive() - Duration::days(30)),
        deadline_date: Set(deadline_date),
        status: Set(ProjectStatus::InProgress.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_custom_role(
    db: &DatabaseConnection,
    organization_id: Uuid,
    name: &str,
) -> custom_role_model::Model {
    custom_role_model::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(organization_id),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn attach_role(db: &DatabaseConnection, project_id: Uuid, custom_role_id: Uuid) {
    project_custom_role_model::ActiveModel {
        project_id: Set(project_id),
        custom_role_id: Set(custom_role_id),
    }
    .insert(db)
    .await
    .unwrap();
}

/// ディレクトリから識別情報を解決する
pub async fn identity_of(db: &Arc<DatabaseConnection>, user_id: Uuid) -> CallerIdentity {
    DirectoryIdentityProvider::new(db.clone())
        .resolve(user_id)
        .await
        .unwrap()
}

/// 1組織・1部門・PM・部門マネージャー・従業員・締切ありプロジェクトの基本構成
pub struct Scenario {
    pub db: Arc<DatabaseConnection>,
    pub organization: organization_model::Model,
    pub department: department_model::Model,
    pub project: project_model::Model,
    pub role: custom_role_model::Model,
    pub pm: CallerIdentity,
    pub manager: CallerIdentity,
    pub employee: user_model::Model,
}

impl Scenario {
    pub async fn new(db: Arc<DatabaseConnection>) -> Self {
        let conn = db.as_ref();
        let organization = create_organization(conn, "Acme").await;
        let department = create_department(conn, organization.id, "Engineering").await;

        let manager = create_user(
            conn,
            Some(organization.id),
            Some(department.id),
            &[PrimaryRole::Employee, PrimaryRole::DepartmentManager],
        )
        .await;
        set_department_manager(conn, department.id, manager.id).await;

        let pm = create_user(
            conn,
            Some(organization.id),
            None,
            &[PrimaryRole::Employee, PrimaryRole::ProjectManager],
        )
        .await;
        let employee = create_user(
            conn,
            Some(organization.id),
            Some(department.id),
            &[PrimaryRole::Employee],
        )
        .await;

        let project = create_project(
            conn,
            organization.id,
            ProjectPeriod::Fixed,
            Some(Utc::now().date_naive() + Duration::days(90)),
        )
        .await;
        let role = create_custom_role(conn, organization.id, "Backend").await;
        attach_role(conn, project.id, role.id).await;

        let pm = identity_of(&db, pm.id).await;
        let manager = identity_of(&db, manager.id).await;

        Self {
            db,
            organization,
            department,
            project,
            role,
            pm,
            manager,
            employee,
        }
    }

    pub fn proposals(&self) -> ProposalService {
        ProposalService::new(self.db.clone(), WorkflowConfig::default())
    }

    pub fn lenient_proposals(&self) -> ProposalService {
        ProposalService::new(
            self.db.clone(),
            WorkflowConfig {
                strict_rejection: false,
            },
        )
    }

    pub fn allocation_request(&self, user_id: Uuid, hours: i32) -> CreateAllocationProposalRequest {
        CreateAllocationProposalRequest {
            project_id: self.project.id,
            user_id,
            work_hours: hours,
            role_ids: vec![self.role.id],
            comment: Some("needs backend help".to_string()),
        }
    }

    /// 提案と承認を通して配属する
    pub async fn allocate(&self, user_id: Uuid, project_id: Uuid, hours: i32) {
        let service = self.proposals();
        let ack = service
            .create_allocation_proposal(
                &self.pm,
                CreateAllocationProposalRequest {
                    project_id,
                    user_id,
                    work_hours: hours,
                    role_ids: vec![],
                    comment: None,
                },
            )
            .await
            .unwrap();
        service
            .accept_allocation_proposal(&self.manager, ack.proposal_id)
            .await
            .unwrap();
    }

    /// 同じ部門に従業員を追加
    pub async fn add_employee(&self) -> user_model::Model {
        create_user(
            self.db.as_ref(),
            Some(self.organization.id),
            Some(self.department.id),
            &[PrimaryRole::Employee],
        )
        .await
    }

    pub async fn add_project(&self, deadline_date: Option<NaiveDate>) -> project_model::Model {
        let period = if deadline_date.is_some() {
            ProjectPeriod::Fixed
        } else {
            ProjectPeriod::Ongoing
        };
        create_project(self.db.as_ref(), self.organization.id, period, deadline_date).await
    }
}

// --- 状態確認 ---

pub async fn allocation_proposal_count(db: &DatabaseConnection, user_id: Uuid, project_id: Uuid) -> u64 {
    allocation_proposal_model::Entity::find()
        .filter(allocation_proposal_model::Column::UserId.eq(user_id))
        .filter(allocation_proposal_model::Column::ProjectId.eq(project_id))
        .count(db)
        .await
        .unwrap()
}

pub async fn deallocation_proposal_count(
    db: &DatabaseConnection,
    user_id: Uuid,
    project_id: Uuid,
) -> u64 {
    deallocation_proposal_model::Entity::find()
        .filter(deallocation_proposal_model::Column::UserId.eq(user_id))
        .filter(deallocation_proposal_model::Column::ProjectId.eq(project_id))
        .count(db)
        .await
        .unwrap()
}

pub async fn is_member(db: &DatabaseConnection, user_id: Uuid, project_id: Uuid) -> bool {
    ProjectRepository::find_member_ids(db, project_id)
        .await
        .unwrap()
        .contains(&user_id)
}

pub async fn is_deallocated(db: &DatabaseConnection, user_id: Uuid, project_id: Uuid) -> bool {
    ProjectRepository::find_deallocated_member_ids(db, project_id)
        .await
        .unwrap()
        .contains(&user_id)
}

pub async fn work_hours(db: &DatabaseConnection, user_id: Uuid, project_id: Uuid) -> Option<i32> {
    WorkHourRepository::find(db, user_id, project_id)
        .await
        .unwrap()
        .map(|record| record.hours)
}

pub async fn bound_roles(db: &DatabaseConnection, user_id: Uuid, project_id: Uuid) -> Vec<Uuid> {
    CustomRoleRepository::find_bound_role_ids(db, user_id, project_id)
        .await
        .unwrap()
}

pub async fn notifications_for(
    db: &DatabaseConnection,
    manager_id: Uuid,
) -> Vec<notification_model::Model> {
    notification_model::Entity::find()
        .filter(notification_model::Column::ToManager.eq(manager_id))
        .all(db)
        .await
        .unwrap()
}
