// staffing-backend/src/api/dto/proposal_dto.rs

use crate::domain::allocation_proposal_model::Model as AllocationProposal;
use crate::domain::deallocation_proposal_model::Model as DeallocationProposal;
use crate::domain::proposal_state::{ProposalKind, ProposalState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 配属提案リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAllocationProposalRequest {
    pub project_id: Uuid,

    pub user_id: Uuid,

    #[validate(range(min = 1, max = 8, message = "Work hours must be between 1 and 8"))]
    pub work_hours: i32,

    #[serde(default)]
    pub role_ids: Vec<Uuid>,

    #[validate(length(max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub comment: Option<String>,
}

/// 解除提案リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDeallocationProposalRequest {
    pub project_id: Uuid,

    pub user_id: Uuid,

    #[validate(length(max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub comment: Option<String>,
}

/// 提案受付の応答（承認待ちの部門マネージャー）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalAcknowledgement {
    pub proposal_id: Uuid,
    pub kind: ProposalKind,
    pub awaiting_approver: Uuid,
    pub department_id: Uuid,
}

/// 承認・却下の結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDecisionResponse {
    pub proposal_id: Uuid,
    pub kind: ProposalKind,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub state: ProposalState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationProposalResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub work_hours: i32,
    pub comment: Option<String>,
    pub proposed_by: Uuid,
    pub role_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AllocationProposalResponse {
    pub fn from_model(proposal: AllocationProposal, role_ids: Vec<Uuid>) -> Self {
        Self {
            id: proposal.id,
            project_id: proposal.project_id,
            user_id: proposal.user_id,
            work_hours: proposal.work_hours,
            comment: proposal.comment,
            proposed_by: proposal.proposed_by,
            role_ids,
            created_at: proposal.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeallocationProposalResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub reason: Option<String>,
    pub proposed_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<DeallocationProposal> for DeallocationProposalResponse {
    fn from(proposal: DeallocationProposal) -> Self {
        Self {
            id: proposal.id,
            project_id: proposal.project_id,
            user_id: proposal.user_id,
            reason: proposal.reason,
            proposed_by: proposal.proposed_by,
            created_at: proposal.created_at,
        }
    }
}
