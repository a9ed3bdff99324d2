// staffing-backend/src/domain/project_custom_role_model.rs

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_custom_roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub custom_role_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_model::Entity",
        from = "Column::ProjectId",
        to = "super::project_model::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::custom_role_model::Entity",
        from = "Column::CustomRoleId",
        to = "super::custom_role_model::Column::Id"
    )]
    CustomRole,
}

impl ActiveModelBehavior for ActiveModel {}
