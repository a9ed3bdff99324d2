// staffing-backend/src/domain/work_hour_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 1日あたりに割り当て可能な最大時間
pub const MAX_DAILY_WORK_HOURS: i32 = 8;
pub const MIN_ALLOCATED_WORK_HOURS: i32 = 1;

/// (user, project) ごとの確保済み工数
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_hours")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub hours: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::UserId",
        to = "super::user_model::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::project_model::Entity",
        from = "Column::ProjectId",
        to = "super::project_model::Column::Id"
    )]
    Project,
}

impl ActiveModelBehavior for ActiveModel {}

/// 割り当て工数が許容範囲内か
pub fn is_valid_allocation(hours: i32) -> bool {
    (MIN_ALLOCATED_WORK_HOURS..=MAX_DAILY_WORK_HOURS).contains(&hours)
}
