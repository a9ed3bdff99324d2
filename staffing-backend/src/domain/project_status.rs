// staffing-backend/src/domain/project_status.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// プロジェクトのステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    NotStarted,
    Starting,
    InProgress,
    Closing,
    Closed,
}

impl ProjectStatus {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_started" => Some(Self::NotStarted),
            "starting" => Some(Self::Starting),
            "in_progress" => Some(Self::InProgress),
            "closing" => Some(Self::Closing),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Starting => "starting",
            Self::InProgress => "in_progress",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }

    /// 作成時に指定できるステータスかどうか
    pub fn is_valid_initial(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Starting)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// プロジェクト期間の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPeriod {
    /// 締切あり
    Fixed,
    /// 締切なし
    Ongoing,
}

impl ProjectPeriod {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "ongoing" => Some(Self::Ongoing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Ongoing => "ongoing",
        }
    }

    /// 期間種別と日付の組み合わせを検証する
    ///
    /// Fixed は開始日以降の締切が必須、Ongoing は締切を持たない。
    pub fn validate_schedule(
        &self,
        start_date: NaiveDate,
        deadline_date: Option<NaiveDate>,
    ) -> Result<(), String> {
        match (self, deadline_date) {
            (Self::Fixed, None) => Err("A fixed project requires a deadline date".to_string()),
            (Self::Fixed, Some(deadline)) if deadline < start_date => {
                Err("Deadline date must not be before the start date".to_string())
            }
            (Self::Fixed, Some(_)) => Ok(()),
            (Self::Ongoing, Some(_)) => {
                Err("An ongoing project must not have a deadline date".to_string())
            }
            (Self::Ongoing, None) => Ok(()),
        }
    }
}

impl fmt::Display for ProjectPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
