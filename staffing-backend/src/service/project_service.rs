// staffing-backend/src/service/project_service.rs

use crate::api::dto::project_dto::*;
use crate::domain::identity::CallerIdentity;
use crate::domain::primary_role::PrimaryRole;
use crate::domain::project_model::{self, Model as Project};
use crate::domain::project_status::{ProjectPeriod, ProjectStatus};
use crate::domain::technology_model::Model as Technology;
use crate::error::{AppError, AppResult};
use crate::repository::custom_role_repository::CustomRoleRepository;
use crate::repository::project_repository::ProjectRepository;
use crate::repository::technology_repository::TechnologyRepository;
use crate::utils::transaction::TransactionManager;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, IntoActiveModel, Set};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ProjectService {
    db: Arc<DatabaseConnection>,
}

impl ProjectService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// プロジェクトを作成
    pub async fn create_project(
        &self,
        requester: &CallerIdentity,
        request: CreateProjectRequest,
    ) -> AppResult<ProjectResponse> {
        require_project_manager(requester)?;
        let organization_id = requester
            .organization_id
            .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

        request
            .period
            .validate_schedule(request.start_date, request.deadline_date)
            .map_err(AppError::ValidationError)?;

        let status = request.status.unwrap_or(ProjectStatus::NotStarted);
        if !status.is_valid_initial() {
            return Err(AppError::ValidationError(
                "A new project must be not_started or starting".to_string(),
            ));
        }

        let requester_id = requester.user_id;
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let mut role_ids = request.role_ids;
                    role_ids.sort();
                    role_ids.dedup();
                    for role_id in &role_ids {
                        ensure_role_in_organization(txn, *role_id, organization_id).await?;
                    }

                    let now = Utc::now();
                    let project = ProjectRepository::create(
                        txn,
                        project_model::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            organization_id: Set(organization_id),
                            name: Set(request.name),
                            description: Set(request.description),
                            period: Set(request.period.as_str().to_string()),
                            start_date: Set(request.start_date),
                            deadline_date: Set(request.deadline_date),
                            status: Set(status.as_str().to_string()),
                            created_at: Set(now),
                            updated_at: Set(now),
                        },
                    )
                    .await?;

                    for role_id in &role_ids {
                        ProjectRepository::attach_custom_role(txn, project.id, *role_id).await?;
                    }

                    info!(
                        project_id = %project.id,
                        organization_id = %organization_id,
                        created_by = %requester_id,
                        period = %project.period,
                        custom_roles = role_ids.len(),
                        "Project created"
                    );

                    Ok(ProjectResponse::from_model(project, role_ids))
                })
            })
            .await
    }

    /// プロジェクトを更新（期間と締切は更新後の値で再検証する）
    pub async fn update_project(
        &self,
        requester: &CallerIdentity,
        project_id: Uuid,
        request: UpdateProjectRequest,
    ) -> AppResult<ProjectResponse> {
        require_project_manager(requester)?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let project = find_project_in_organization(txn, &requester, project_id).await?;

                    let current_period = project.get_period().ok_or_else(|| {
                        AppError::InternalServerError(format!(
                            "Project {} has an unknown period",
                            project.id
                        ))
                    })?;
                    let period = request.period.unwrap_or(current_period);
                    let start_date = request.start_date.unwrap_or(project.start_date);
                    let deadline_date = match period {
                        ProjectPeriod::Fixed => request.deadline_date.or(project.deadline_date),
                        ProjectPeriod::Ongoing => request.deadline_date,
                    };
                    period
                        .validate_schedule(start_date, deadline_date)
                        .map_err(AppError::ValidationError)?;

                    let mut active = project.into_active_model();
                    if let Some(name) = request.name {
                        active.name = Set(name);
                    }
                    if let Some(description) = request.description {
                        active.description = Set(description);
                    }
                    if let Some(status) = request.status {
                        active.status = Set(status.as_str().to_string());
                    }
                    active.period = Set(period.as_str().to_string());
                    active.start_date = Set(start_date);
                    active.deadline_date = Set(deadline_date);

                    let updated = ProjectRepository::update(txn, active).await?;
                    let role_ids = ProjectRepository::find_custom_role_ids(txn, updated.id).await?;

                    info!(
                        project_id = %updated.id,
                        updated_by = %requester.user_id,
                        status = %updated.status,
                        "Project updated"
                    );

                    Ok(ProjectResponse::from_model(updated, role_ids))
                })
            })
            .await
    }

    /// プロジェクトにカスタムロールを紐付ける（紐付け済みでも成功）
    pub async fn attach_custom_role(
        &self,
        requester: &CallerIdentity,
        project_id: Uuid,
        custom_role_id: Uuid,
    ) -> AppResult<CustomRoleAttachmentResponse> {
        require_project_manager(requester)?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let project = find_project_in_organization(txn, &requester, project_id).await?;
                    ensure_role_in_organization(txn, custom_role_id, project.organization_id)
                        .await?;

                    let attached =
                        ProjectRepository::attach_custom_role(txn, project.id, custom_role_id)
                            .await?;

                    info!(
                        project_id = %project.id,
                        custom_role_id = %custom_role_id,
                        attached,
                        "Custom role attached to project"
                    );

                    Ok(CustomRoleAttachmentResponse {
                        project_id: project.id,
                        custom_role_id,
                        attached,
                    })
                })
            })
            .await
    }

    /// プロジェクトを削除
    pub async fn delete_project(
        &self,
        requester: &CallerIdentity,
        project_id: Uuid,
    ) -> AppResult<()> {
        require_project_manager(requester)?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let project = find_project_in_organization(txn, &requester, project_id).await?;
                    let members = ProjectRepository::find_member_ids(txn, project.id).await?;

                    if !ProjectRepository::delete(txn, project.id).await? {
                        return Err(AppError::NotFound("Project not found".to_string()));
                    }

                    info!(
                        project_id = %project.id,
                        deleted_by = %requester.user_id,
                        members = members.len(),
                        "Project deleted"
                    );
                    Ok(())
                })
            })
            .await
    }

    // --- 技術スタック ---

    /// 組織に技術を登録（組織管理者のみ）
    pub async fn create_technology(
        &self,
        requester: &CallerIdentity,
        request: CreateTechnologyRequest,
    ) -> AppResult<TechnologyResponse> {
        if !requester.has_role(PrimaryRole::OrganizationAdmin) {
            warn!(
                user_id = %requester.user_id,
                "Technology registration requires organization admin role"
            );
            return Err(AppError::Forbidden(
                "Only organization admins can register technologies".to_string(),
            ));
        }
        let organization_id = requester
            .organization_id
            .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Technology name must not be blank".to_string(),
            ));
        }

        let technology =
            TechnologyRepository::create(self.db.as_ref(), organization_id, name).await?;

        info!(
            technology_id = %technology.id,
            organization_id = %organization_id,
            name = %technology.name,
            "Technology registered"
        );

        Ok(technology.into())
    }

    /// 呼び出し元の組織の技術一覧
    pub async fn list_technologies(
        &self,
        requester: &CallerIdentity,
    ) -> AppResult<Vec<TechnologyResponse>> {
        let organization_id = requester
            .organization_id
            .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

        let technologies =
            TechnologyRepository::find_by_organization(self.db.as_ref(), organization_id).await?;
        Ok(technologies.into_iter().map(Into::into).collect())
    }

    /// プロジェクトに割り当てられた技術一覧
    pub async fn list_project_technologies(
        &self,
        requester: &CallerIdentity,
        project_id: Uuid,
    ) -> AppResult<Vec<TechnologyResponse>> {
        let db = self.db.as_ref();
        let project = find_project_in_organization(db, requester, project_id).await?;
        let technologies = TechnologyRepository::find_for_project(db, project.id).await?;
        Ok(technologies.into_iter().map(Into::into).collect())
    }

    /// プロジェクトに技術を割り当てる（割り当て済みでも成功）
    pub async fn assign_technology(
        &self,
        requester: &CallerIdentity,
        project_id: Uuid,
        technology_id: Uuid,
    ) -> AppResult<TechnologyAssignmentResponse> {
        require_project_manager(requester)?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let project = find_project_in_organization(txn, &requester, project_id).await?;
                    let technology =
                        find_technology_in_organization(txn, technology_id, project.organization_id)
                            .await?;

                    let changed =
                        TechnologyRepository::assign_to_project(txn, project.id, technology.id)
                            .await?;

                    info!(
                        project_id = %project.id,
                        technology_id = %technology.id,
                        changed,
                        "Technology assigned to project"
                    );

                    Ok(TechnologyAssignmentResponse {
                        project_id: project.id,
                        technology_id: technology.id,
                        changed,
                    })
                })
            })
            .await
    }

    /// プロジェクトから技術を外す（未割り当てなら NotFound）
    pub async fn unassign_technology(
        &self,
        requester: &CallerIdentity,
        project_id: Uuid,
        technology_id: Uuid,
    ) -> AppResult<TechnologyAssignmentResponse> {
        require_project_manager(requester)?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let project = find_project_in_organization(txn, &requester, project_id).await?;
                    let technology =
                        find_technology_in_organization(txn, technology_id, project.organization_id)
                            .await?;

                    if !TechnologyRepository::unassign_from_project(txn, project.id, technology.id)
                        .await?
                    {
                        return Err(AppError::NotFound(format!(
                            "Technology {} is not assigned to the project",
                            technology.id
                        )));
                    }

                    info!(
                        project_id = %project.id,
                        technology_id = %technology.id,
                        "Technology removed from project"
                    );

                    Ok(TechnologyAssignmentResponse {
                        project_id: project.id,
                        technology_id: technology.id,
                        changed: true,
                    })
                })
            })
            .await
    }
}

fn require_project_manager(requester: &CallerIdentity) -> AppResult<()> {
    if requester.has_role(PrimaryRole::ProjectManager) {
        return Ok(());
    }
    warn!(user_id = %requester.user_id, "Project management requires project manager role");
    Err(AppError::Forbidden(
        "Only project managers can manage projects".to_string(),
    ))
}

async fn find_project_in_organization<C: ConnectionTrait>(
    db: &C,
    requester: &CallerIdentity,
    project_id: Uuid,
) -> AppResult<Project> {
    let project = ProjectRepository::find_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    if !project.belongs_to_organization(requester.organization_id) {
        return Err(AppError::Forbidden(
            "Project belongs to a different organization".to_string(),
        ));
    }
    Ok(project)
}

/// 他組織のロールは存在しないものとして扱う
async fn ensure_role_in_organization<C: ConnectionTrait>(
    db: &C,
    custom_role_id: Uuid,
    organization_id: Uuid,
) -> AppResult<()> {
    match CustomRoleRepository::find_by_id(db, custom_role_id).await? {
        Some(role) if role.organization_id == organization_id => Ok(()),
        _ => Err(AppError::NotFound(format!(
            "Custom role {} not found",
            custom_role_id
        ))),
    }
}

/// 他組織の技術は存在しないものとして扱う
async fn find_technology_in_organization<C: ConnectionTrait>(
    db: &C,
    technology_id: Uuid,
    organization_id: Uuid,
) -> AppResult<Technology> {
    match TechnologyRepository::find_by_id(db, technology_id).await? {
        Some(technology) if technology.belongs_to_organization(organization_id) => Ok(technology),
        _ => Err(AppError::NotFound(format!(
            "Technology {} not found",
            technology_id
        ))),
    }
}
