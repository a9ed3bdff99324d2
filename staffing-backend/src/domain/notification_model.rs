// staffing-backend/src/domain/notification_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Allocation,
    Deallocation,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allocation => "ALLOCATION",
            Self::Deallocation => "DEALLOCATION",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ALLOCATION" => Some(Self::Allocation),
            "DEALLOCATION" => Some(Self::Deallocation),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 部門マネージャー宛ての未配送通知
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub notification_type: String,
    pub to_manager: Uuid,
    pub for_user: Uuid,
    pub project_id: Uuid,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::ToManager",
        to = "super::user_model::Column::Id"
    )]
    Manager,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn get_type(&self) -> Option<NotificationType> {
        NotificationType::from_str(&self.notification_type)
    }
}
