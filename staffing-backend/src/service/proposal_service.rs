// staffing-backend/src/service/proposal_service.rs

//! 配属・解除提案のワークフロー
//!
//! PM が提案を作成し、対象ユーザーの部門マネージャーが承認または却下する。
//! 各操作は単一トランザクションで実行し、前提条件はトランザクション内で再検証する。

use crate::api::dto::proposal_dto::*;
use crate::config::WorkflowConfig;
use crate::domain::department_model::Model as Department;
use crate::domain::identity::CallerIdentity;
use crate::domain::notification_model::NotificationType;
use crate::domain::primary_role::PrimaryRole;
use crate::domain::project_model::Model as Project;
use crate::domain::proposal_state::{ProposalKind, ProposalState};
use crate::domain::user_model::Model as User;
use crate::domain::work_hour_model;
use crate::error::{AppError, AppResult};
use crate::repository::custom_role_repository::CustomRoleRepository;
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::notification_repository::NotificationRepository;
use crate::repository::project_repository::ProjectRepository;
use crate::repository::proposal_repository::{
    NewAllocationProposal, NewDeallocationProposal, ProposalRepository,
};
use crate::repository::user_repository::UserRepository;
use crate::repository::work_hour_repository::WorkHourRepository;
use crate::utils::transaction::TransactionManager;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ProposalService {
    db: Arc<DatabaseConnection>,
    workflow: WorkflowConfig,
}

impl ProposalService {
    pub fn new(db: Arc<DatabaseConnection>, workflow: WorkflowConfig) -> Self {
        Self { db, workflow }
    }

    // --- 作成 ---

    /// 配属提案を作成し、対象ユーザーの部門マネージャーへ通知する
    pub async fn create_allocation_proposal(
        &self,
        requester: &CallerIdentity,
        request: CreateAllocationProposalRequest,
    ) -> AppResult<ProposalAcknowledgement> {
        require_role(
            requester,
            PrimaryRole::ProjectManager,
            "Only project managers can propose allocations",
        )?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let (project, user) =
                        load_target(txn, &requester, request.project_id, request.user_id).await?;

                    if ProjectRepository::is_member(txn, project.id, user.id).await? {
                        return Err(AppError::Conflict(
                            "User is already part of the project".to_string(),
                        ));
                    }

                    if !work_hour_model::is_valid_allocation(request.work_hours) {
                        return Err(AppError::ValidationError(format!(
                            "Work hours must be between {} and {}",
                            work_hour_model::MIN_ALLOCATED_WORK_HOURS,
                            work_hour_model::MAX_DAILY_WORK_HOURS
                        )));
                    }

                    for role_id in &request.role_ids {
                        if CustomRoleRepository::find_by_id(txn, *role_id).await?.is_none() {
                            return Err(AppError::NotFound(format!(
                                "Custom role {} not found",
                                role_id
                            )));
                        }
                        if !ProjectRepository::has_custom_role(txn, project.id, *role_id).await? {
                            return Err(AppError::Conflict(format!(
                                "Custom role {} is not part of the project",
                                role_id
                            )));
                        }
                    }

                    if ProposalRepository::allocation_exists(txn, user.id, project.id).await? {
                        return Err(AppError::Conflict(
                            "Proposal for the user already exists".to_string(),
                        ));
                    }

                    let (department, manager_id) = find_approver(txn, &user).await?;

                    let proposal = ProposalRepository::create_allocation(
                        txn,
                        NewAllocationProposal {
                            project_id: project.id,
                            user_id: user.id,
                            work_hours: request.work_hours,
                            comment: request.comment,
                            proposed_by: requester.user_id,
                            role_ids: request.role_ids,
                        },
                    )
                    .await?;

                    NotificationRepository::create(
                        txn,
                        NotificationType::Allocation,
                        manager_id,
                        user.id,
                        project.id,
                    )
                    .await?;

                    info!(
                        proposal_id = %proposal.id,
                        project_id = %project.id,
                        user_id = %user.id,
                        proposed_by = %requester.user_id,
                        work_hours = proposal.work_hours,
                        approver = %manager_id,
                        "Allocation proposal created"
                    );

                    Ok(ProposalAcknowledgement {
                        proposal_id: proposal.id,
                        kind: ProposalKind::Allocation,
                        awaiting_approver: manager_id,
                        department_id: department.id,
                    })
                })
            })
            .await
    }

    /// 解除提案を作成する
    ///
    /// 工数台帳はこの時点では変更せず、承認時に削除する。
    pub async fn create_deallocation_proposal(
        &self,
        requester: &CallerIdentity,
        request: CreateDeallocationProposalRequest,
    ) -> AppResult<ProposalAcknowledgement> {
        require_role(
            requester,
            PrimaryRole::ProjectManager,
            "Only project managers can propose deallocations",
        )?;

        let requester = requester.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let (project, user) =
                        load_target(txn, &requester, request.project_id, request.user_id).await?;

                    if !ProjectRepository::is_member(txn, project.id, user.id).await? {
                        return Err(AppError::Conflict(
                            "User is not part of the project".to_string(),
                        ));
                    }

                    if ProposalRepository::deallocation_exists(txn, user.id, project.id).await? {
                        return Err(AppError::Conflict(
                            "Proposal for the user already exists".to_string(),
                        ));
                    }

                    let (department, manager_id) = find_approver(txn, &user).await?;

                    let proposal = ProposalRepository::create_deallocation(
                        txn,
                        NewDeallocationProposal {
                            project_id: project.id,
                            user_id: user.id,
                            reason: request.comment,
                            proposed_by: requester.user_id,
                        },
                    )
                    .await?;

                    NotificationRepository::create(
                        txn,
                        NotificationType::Deallocation,
                        manager_id,
                        user.id,
                        project.id,
                    )
                    .await?;

                    info!(
                        proposal_id = %proposal.id,
                        project_id = %project.id,
                        user_id = %user.id,
                        proposed_by = %requester.user_id,
                        approver = %manager_id,
                        "Deallocation proposal created"
                    );

                    Ok(ProposalAcknowledgement {
                        proposal_id: proposal.id,
                        kind: ProposalKind::Deallocation,
                        awaiting_approver: manager_id,
                        department_id: department.id,
                    })
                })
            })
            .await
    }

    // --- 承認 ---

    /// 配属提案を承認する
    ///
    /// メンバー追加・工数記録・カスタムロール付与・提案削除を一括で行う。
    pub async fn accept_allocation_proposal(
        &self,
        approver: &CallerIdentity,
        proposal_id: Uuid,
    ) -> AppResult<ProposalDecisionResponse> {
        require_role(
            approver,
            PrimaryRole::DepartmentManager,
            "Only department managers can accept proposals",
        )?;

        let approver = approver.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let managed = find_managed_department(txn, &approver).await?;

                    let proposal = ProposalRepository::lock_allocation(txn, proposal_id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

                    let project = find_project(txn, proposal.project_id).await?;
                    let user = find_user(txn, proposal.user_id).await?;
                    ensure_in_department(&user, &managed)?;

                    if ProjectRepository::is_member(txn, project.id, user.id).await? {
                        return Err(AppError::Conflict(
                            "User is already part of the project".to_string(),
                        ));
                    }

                    ProjectRepository::add_member(txn, project.id, user.id).await?;
                    WorkHourRepository::record(txn, user.id, project.id, proposal.work_hours)
                        .await?;

                    let role_ids =
                        ProposalRepository::find_allocation_role_ids(txn, vec![proposal.id])
                            .await?
                            .remove(&proposal.id)
                            .unwrap_or_default();
                    for role_id in &role_ids {
                        CustomRoleRepository::bind_to_user(txn, user.id, project.id, *role_id)
                            .await?;
                    }

                    ProposalRepository::delete_allocation(txn, proposal.id).await?;
                    let committed_hours = WorkHourRepository::sum_for_user(txn, user.id).await?;

                    info!(
                        proposal_id = %proposal.id,
                        project_id = %project.id,
                        user_id = %user.id,
                        approver = %approver.user_id,
                        work_hours = proposal.work_hours,
                        committed_hours,
                        custom_roles = role_ids.len(),
                        "Allocation proposal accepted"
                    );

                    Ok(ProposalDecisionResponse {
                        proposal_id: proposal.id,
                        kind: ProposalKind::Allocation,
                        project_id: project.id,
                        user_id: user.id,
                        state: ProposalState::Accepted,
                    })
                })
            })
            .await
    }

    /// 解除提案を承認する
    ///
    /// メンバー解除・解除履歴追加・カスタムロール剥奪・工数削除・提案削除を一括で行う。
    pub async fn accept_deallocation_proposal(
        &self,
        approver: &CallerIdentity,
        proposal_id: Uuid,
    ) -> AppResult<ProposalDecisionResponse> {
        require_role(
            approver,
            PrimaryRole::DepartmentManager,
            "Only department managers can accept proposals",
        )?;

        let approver = approver.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let managed = find_managed_department(txn, &approver).await?;

                    let proposal = ProposalRepository::lock_deallocation(txn, proposal_id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

                    let project = find_project(txn, proposal.project_id).await?;
                    let user = find_user(txn, proposal.user_id).await?;
                    ensure_in_department(&user, &managed)?;

                    if !ProjectRepository::is_member(txn, project.id, user.id).await? {
                        return Err(AppError::Conflict(
                            "User is not part of the project".to_string(),
                        ));
                    }

                    ProjectRepository::remove_member(txn, project.id, user.id).await?;
                    ProjectRepository::add_deallocated_member(txn, project.id, user.id).await?;
                    let unbound =
                        CustomRoleRepository::unbind_all_for_project(txn, user.id, project.id)
                            .await?;
                    let released_hours =
                        match WorkHourRepository::find(txn, user.id, project.id).await? {
                            Some(record) => {
                                WorkHourRepository::remove(txn, user.id, project.id).await?;
                                record.hours
                            }
                            None => {
                                warn!(
                                    project_id = %project.id,
                                    user_id = %user.id,
                                    "No work hour record found for deallocated member"
                                );
                                0
                            }
                        };
                    ProposalRepository::delete_deallocation(txn, proposal.id).await?;

                    info!(
                        proposal_id = %proposal.id,
                        project_id = %project.id,
                        user_id = %user.id,
                        approver = %approver.user_id,
                        custom_roles_removed = unbound,
                        released_hours,
                        "Deallocation proposal accepted"
                    );

                    Ok(ProposalDecisionResponse {
                        proposal_id: proposal.id,
                        kind: ProposalKind::Deallocation,
                        project_id: project.id,
                        user_id: user.id,
                        state: ProposalState::Accepted,
                    })
                })
            })
            .await
    }

    // --- 却下 ---

    /// 配属提案を却下する（プロジェクトと台帳は変更しない）
    pub async fn reject_allocation_proposal(
        &self,
        approver: &CallerIdentity,
        proposal_id: Uuid,
    ) -> AppResult<ProposalDecisionResponse> {
        let strict = self.workflow.strict_rejection;
        if strict {
            require_role(
                approver,
                PrimaryRole::DepartmentManager,
                "Only department managers can reject proposals",
            )?;
        }

        let approver = approver.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let managed = if strict {
                        Some(find_managed_department(txn, &approver).await?)
                    } else {
                        None
                    };

                    let proposal = ProposalRepository::lock_allocation(txn, proposal_id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

                    if let Some(managed) = &managed {
                        let user = find_user(txn, proposal.user_id).await?;
                        ensure_in_department(&user, managed)?;
                    }

                    ProposalRepository::delete_allocation(txn, proposal.id).await?;

                    info!(
                        proposal_id = %proposal.id,
                        project_id = %proposal.project_id,
                        user_id = %proposal.user_id,
                        rejected_by = %approver.user_id,
                        strict,
                        "Allocation proposal rejected"
                    );

                    Ok(ProposalDecisionResponse {
                        proposal_id: proposal.id,
                        kind: ProposalKind::Allocation,
                        project_id: proposal.project_id,
                        user_id: proposal.user_id,
                        state: ProposalState::Rejected,
                    })
                })
            })
            .await
    }

    /// 解除提案を却下する
    pub async fn reject_deallocation_proposal(
        &self,
        approver: &CallerIdentity,
        proposal_id: Uuid,
    ) -> AppResult<ProposalDecisionResponse> {
        let strict = self.workflow.strict_rejection;
        if strict {
            require_role(
                approver,
                PrimaryRole::DepartmentManager,
                "Only department managers can reject proposals",
            )?;
        }

        let approver = approver.clone();
        self.db
            .execute_in_transaction(move |txn| {
                Box::pin(async move {
                    let managed = if strict {
                        Some(find_managed_department(txn, &approver).await?)
                    } else {
                        None
                    };

                    let proposal = ProposalRepository::lock_deallocation(txn, proposal_id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

                    if let Some(managed) = &managed {
                        let user = find_user(txn, proposal.user_id).await?;
                        ensure_in_department(&user, managed)?;
                    }

                    ProposalRepository::delete_deallocation(txn, proposal.id).await?;

                    info!(
                        proposal_id = %proposal.id,
                        project_id = %proposal.project_id,
                        user_id = %proposal.user_id,
                        rejected_by = %approver.user_id,
                        strict,
                        "Deallocation proposal rejected"
                    );

                    Ok(ProposalDecisionResponse {
                        proposal_id: proposal.id,
                        kind: ProposalKind::Deallocation,
                        project_id: proposal.project_id,
                        user_id: proposal.user_id,
                        state: ProposalState::Rejected,
                    })
                })
            })
            .await
    }

    // --- 一覧 ---

    /// 部門メンバー1人分の未決配属提案
    pub async fn list_allocation_proposals_for_user(
        &self,
        manager: &CallerIdentity,
        user_id: Uuid,
    ) -> AppResult<Vec<AllocationProposalResponse>> {
        let db = self.db.as_ref();
        let department = self.manager_department(manager).await?;
        let user = find_department_member(db, &department, user_id).await?;
        collect_allocations(db, vec![user.id]).await
    }

    /// 部門全体の未決配属提案
    pub async fn list_allocation_proposals_for_department(
        &self,
        manager: &CallerIdentity,
    ) -> AppResult<Vec<AllocationProposalResponse>> {
        let db = self.db.as_ref();
        let department = self.manager_department(manager).await?;
        let members = UserRepository::find_by_department(db, department.id).await?;
        collect_allocations(db, members.into_iter().map(|u| u.id).collect()).await
    }

    pub async fn list_deallocation_proposals_for_user(
        &self,
        manager: &CallerIdentity,
        user_id: Uuid,
    ) -> AppResult<Vec<DeallocationProposalResponse>> {
        let db = self.db.as_ref();
        let department = self.manager_department(manager).await?;
        let user = find_department_member(db, &department, user_id).await?;
        let proposals = ProposalRepository::find_deallocations_for_users(db, vec![user.id]).await?;
        Ok(proposals.into_iter().map(Into::into).collect())
    }

    pub async fn list_deallocation_proposals_for_department(
        &self,
        manager: &CallerIdentity,
    ) -> AppResult<Vec<DeallocationProposalResponse>> {
        let db = self.db.as_ref();
        let department = self.manager_department(manager).await?;
        let members = UserRepository::find_by_department(db, department.id).await?;
        let proposals = ProposalRepository::find_deallocations_for_users(
            db,
            members.into_iter().map(|u| u.id).collect(),
        )
        .await?;
        Ok(proposals.into_iter().map(Into::into).collect())
    }

    async fn manager_department(&self, manager: &CallerIdentity) -> AppResult<Department> {
        require_role(
            manager,
            PrimaryRole::DepartmentManager,
            "Only department managers can view proposals",
        )?;
        find_managed_department(self.db.as_ref(), manager).await
    }
}

fn require_role(identity: &CallerIdentity, role: PrimaryRole, message: &str) -> AppResult<()> {
    if identity.has_role(role) {
        Ok(())
    } else {
        warn!(
            user_id = %identity.user_id,
            required_role = %role,
            "Permission denied for proposal workflow"
        );
        Err(AppError::Forbidden(message.to_string()))
    }
}

async fn find_project<C: ConnectionTrait>(db: &C, project_id: Uuid) -> AppResult<Project> {
    ProjectRepository::find_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

async fn find_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<User> {
    UserRepository::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// 提案対象のプロジェクトとユーザーを取得し、提案者と同じ組織か確認する
async fn load_target<C: ConnectionTrait>(
    db: &C,
    requester: &CallerIdentity,
    project_id: Uuid,
    user_id: Uuid,
) -> AppResult<(Project, User)> {
    let project = find_project(db, project_id).await?;
    if !project.belongs_to_organization(requester.organization_id) {
        return Err(AppError::Forbidden(
            "Project belongs to a different organization".to_string(),
        ));
    }

    let user = find_user(db, user_id).await?;
    if !user.is_same_organization(requester.organization_id) {
        return Err(AppError::Forbidden(
            "User belongs to a different organization".to_string(),
        ));
    }

    Ok((project, user))
}

/// 対象ユーザーの部門とその部門マネージャー
async fn find_approver<C: ConnectionTrait>(db: &C, user: &User) -> AppResult<(Department, Uuid)> {
    let department_id = user
        .department_id
        .ok_or_else(|| AppError::NotFound("User is not in any department".to_string()))?;
    let department = DepartmentRepository::find_by_id(db, department_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;
    let manager_id = department
        .manager_id
        .ok_or_else(|| AppError::NotFound("Department manager not found".to_string()))?;
    Ok((department, manager_id))
}

async fn find_managed_department<C: ConnectionTrait>(
    db: &C,
    approver: &CallerIdentity,
) -> AppResult<Department> {
    DepartmentRepository::find_managed_by(db, approver.user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("You do not manage any department".to_string()))
}

fn ensure_in_department(user: &User, department: &Department) -> AppResult<()> {
    if user.department_id == Some(department.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "User is not a member of your department".to_string(),
        ))
    }
}

async fn find_department_member<C: ConnectionTrait>(
    db: &C,
    department: &Department,
    user_id: Uuid,
) -> AppResult<User> {
    let user = UserRepository::find_by_id(db, user_id).await?;
    match user {
        Some(user) if user.department_id == Some(department.id) => Ok(user),
        _ => Err(AppError::NotFound(
            "User not found in your department".to_string(),
        )),
    }
}

async fn collect_allocations<C: ConnectionTrait>(
    db: &C,
    user_ids: Vec<Uuid>,
) -> AppResult<Vec<AllocationProposalResponse>> {
    let proposals = ProposalRepository::find_allocations_for_users(db, user_ids).await?;
    let mut roles = ProposalRepository::find_allocation_role_ids(
        db,
        proposals.iter().map(|p| p.id).collect(),
    )
    .await?;

    Ok(proposals
        .into_iter()
        .map(|proposal| {
            let role_ids = roles.remove(&proposal.id).unwrap_or_default();
            AllocationProposalResponse::from_model(proposal, role_ids)
        })
        .collect())
}
