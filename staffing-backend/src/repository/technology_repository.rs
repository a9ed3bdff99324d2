// src/repository/technology_repository.rs

use crate::domain::project_technology_model::{self, Entity as ProjectTechnologyEntity};
use crate::domain::technology_model::{self, Entity as TechnologyEntity};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct TechnologyRepository;

impl TechnologyRepository {
    /// 組織内で同名の技術があれば Conflict
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        organization_id: Uuid,
        name: String,
    ) -> Result<technology_model::Model, AppError> {
        let created = technology_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(name),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| {
            AppError::from_db_with_conflict(
                e,
                "A technology with the same name already exists in the organization",
            )
        })?;
        Ok(created)
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<technology_model::Model>, AppError> {
        Ok(TechnologyEntity::find_by_id(id).one(db).await?)
    }

    pub async fn find_by_organization<C: ConnectionTrait>(
        db: &C,
        organization_id: Uuid,
    ) -> Result<Vec<technology_model::Model>, AppError> {
        let technologies = TechnologyEntity::find()
            .filter(technology_model::Column::OrganizationId.eq(organization_id))
            .order_by_asc(technology_model::Column::Name)
            .all(db)
            .await?;
        Ok(technologies)
    }

    // --- プロジェクトへの割り当て ---

    /// 割り当て済みなら何もせず false
    pub async fn assign_to_project<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        technology_id: Uuid,
    ) -> Result<bool, AppError> {
        let existing = ProjectTechnologyEntity::find_by_id((project_id, technology_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }
        project_technology_model::ActiveModel {
            project_id: Set(project_id),
            technology_id: Set(technology_id),
        }
        .insert(db)
        .await?;
        Ok(true)
    }

    pub async fn unassign_from_project<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        technology_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = ProjectTechnologyEntity::delete_by_id((project_id, technology_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// プロジェクトに割り当てられた技術（名前順）
    pub async fn find_for_project<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<technology_model::Model>, AppError> {
        let technology_ids: Vec<Uuid> = ProjectTechnologyEntity::find()
            .filter(project_technology_model::Column::ProjectId.eq(project_id))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.technology_id)
            .collect();
        if technology_ids.is_empty() {
            return Ok(Vec::new());
        }

        let technologies = TechnologyEntity::find()
            .filter(technology_model::Column::Id.is_in(technology_ids))
            .order_by_asc(technology_model::Column::Name)
            .all(db)
            .await?;
        Ok(technologies)
    }
}
