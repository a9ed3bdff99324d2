// staffing-backend/src/domain/proposal_state.rs

use serde::{Deserialize, Serialize};

/// 提案の状態遷移
///
/// 永続化されるのは Open のみで、確定した提案は行ごと削除される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    Open,
    Accepted,
    Rejected,
}

/// 提案の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    Allocation,
    Deallocation,
}

impl ProposalState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    pub fn can_transition_to(&self, next: ProposalState) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Accepted) | (Self::Open, Self::Rejected)
        )
    }
}

impl ProposalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allocation => "allocation",
            Self::Deallocation => "deallocation",
        }
    }
}
