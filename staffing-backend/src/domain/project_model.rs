// staffing-backend/src/domain/project_model.rs

use super::project_status::ProjectPeriod;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub organization_id: Uuid,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// "fixed" | "ongoing"
    pub period: String,

    pub start_date: NaiveDate,

    #[sea_orm(nullable)]
    pub deadline_date: Option<NaiveDate>,

    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization_model::Entity",
        from = "Column::OrganizationId",
        to = "super::organization_model::Column::Id"
    )]
    Organization,
}

impl Related<super::organization_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    pub fn get_period(&self) -> Option<ProjectPeriod> {
        ProjectPeriod::from_str(&self.period)
    }

    pub fn belongs_to_organization(&self, organization_id: Option<Uuid>) -> bool {
        organization_id == Some(self.organization_id)
    }

    /// 締切の近さを判定できるのは締切ありのプロジェクトのみ
    pub fn fixed_deadline(&self) -> Option<NaiveDate> {
        match self.get_period() {
            Some(ProjectPeriod::Fixed) => self.deadline_date,
            _ => None,
        }
    }
}
