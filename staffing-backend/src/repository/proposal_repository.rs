// src/repository/proposal_repository.rs

use crate::domain::allocation_proposal_model::{self, Entity as AllocationProposalEntity};
use crate::domain::allocation_proposal_role_model::{self, Entity as AllocationProposalRoleEntity};
use crate::domain::deallocation_proposal_model::{self, Entity as DeallocationProposalEntity};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::HashMap;
use uuid::Uuid;

/// 新規配属提案の内容
#[derive(Debug, Clone)]
pub struct NewAllocationProposal {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub work_hours: i32,
    pub comment: Option<String>,
    pub proposed_by: Uuid,
    pub role_ids: Vec<Uuid>,
}

/// 新規解除提案の内容
#[derive(Debug, Clone)]
pub struct NewDeallocationProposal {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub reason: Option<String>,
    pub proposed_by: Uuid,
}

pub struct ProposalRepository;

impl ProposalRepository {
    // --- 配属提案 ---

    /// 配属提案とロール集合を登録
    ///
    /// (user_id, project_id) の一意制約違反は Conflict として返す。
    pub async fn create_allocation<C: ConnectionTrait>(
        db: &C,
        proposal: NewAllocationProposal,
    ) -> Result<allocation_proposal_model::Model, AppError> {
        let created = allocation_proposal_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(proposal.project_id),
            user_id: Set(proposal.user_id),
            work_hours: Set(proposal.work_hours),
            comment: Set(proposal.comment),
            proposed_by: Set(proposal.proposed_by),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            AppError::from_db_with_conflict(e, "Proposal for the user already exists")
        })?;

        let mut role_ids = proposal.role_ids;
        role_ids.sort();
        role_ids.dedup();
        for role_id in role_ids {
            allocation_proposal_role_model::ActiveModel {
                proposal_id: Set(created.id),
                custom_role_id: Set(role_id),
            }
            .insert(db)
            .await?;
        }

        Ok(created)
    }

    pub async fn find_allocation_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<allocation_proposal_model::Model>, AppError> {
        Ok(AllocationProposalEntity::find_by_id(id).one(db).await?)
    }

    /// 提案行を FOR UPDATE でロックして取得
    pub async fn lock_allocation<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<allocation_proposal_model::Model>, AppError> {
        let proposal = AllocationProposalEntity::find_by_id(id)
            .lock_exclusive()
            .one(db)
            .await?;
        Ok(proposal)
    }

    pub async fn allocation_exists<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, AppError> {
        let count = AllocationProposalEntity::find()
            .filter(allocation_proposal_model::Column::UserId.eq(user_id))
            .filter(allocation_proposal_model::Column::ProjectId.eq(project_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_allocations_for_users<C: ConnectionTrait>(
        db: &C,
        user_ids: Vec<Uuid>,
    ) -> Result<Vec<allocation_proposal_model::Model>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let proposals = AllocationProposalEntity::find()
            .filter(allocation_proposal_model::Column::UserId.is_in(user_ids))
            .order_by_asc(allocation_proposal_model::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(proposals)
    }

    /// 提案ごとの提案ロールID
    pub async fn find_allocation_role_ids<C: ConnectionTrait>(
        db: &C,
        proposal_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError> {
        if proposal_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = AllocationProposalRoleEntity::find()
            .filter(allocation_proposal_role_model::Column::ProposalId.is_in(proposal_ids))
            .all(db)
            .await?;

        let mut roles: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in rows {
            roles.entry(row.proposal_id).or_default().push(row.custom_role_id);
        }
        Ok(roles)
    }

    /// 配属提案を削除（ロール行は外部キーのカスケードで消える）
    pub async fn delete_allocation<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, AppError> {
        let result = AllocationProposalEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    // --- 解除提案 ---

    pub async fn create_deallocation<C: ConnectionTrait>(
        db: &C,
        proposal: NewDeallocationProposal,
    ) -> Result<deallocation_proposal_model::Model, AppError> {
        deallocation_proposal_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(proposal.project_id),
            user_id: Set(proposal.user_id),
            reason: Set(proposal.reason),
            proposed_by: Set(proposal.proposed_by),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| AppError::from_db_with_conflict(e, "Proposal for the user already exists"))
    }

    pub async fn find_deallocation_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<deallocation_proposal_model::Model>, AppError> {
        Ok(DeallocationProposalEntity::find_by_id(id).one(db).await?)
    }

    pub async fn lock_deallocation<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<deallocation_proposal_model::Model>, AppError> {
        let proposal = DeallocationProposalEntity::find_by_id(id)
            .lock_exclusive()
            .one(db)
            .await?;
        Ok(proposal)
    }

    pub async fn deallocation_exists<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, AppError> {
        let count = DeallocationProposalEntity::find()
            .filter(deallocation_proposal_model::Column::UserId.eq(user_id))
            .filter(deallocation_proposal_model::Column::ProjectId.eq(project_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_deallocations_for_users<C: ConnectionTrait>(
        db: &C,
        user_ids: Vec<Uuid>,
    ) -> Result<Vec<deallocation_proposal_model::Model>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let proposals = DeallocationProposalEntity::find()
            .filter(deallocation_proposal_model::Column::UserId.is_in(user_ids))
            .order_by_asc(deallocation_proposal_model::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(proposals)
    }

    pub async fn delete_deallocation<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<bool, AppError> {
        let result = DeallocationProposalEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}
