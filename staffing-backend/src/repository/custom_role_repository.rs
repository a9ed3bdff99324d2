// src/repository/custom_role_repository.rs

use crate::domain::custom_role_model::{self, Entity as CustomRoleEntity};
use crate::domain::user_custom_role_model::{self, Entity as UserCustomRoleEntity};
use crate::error::AppError;
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, QueryFilter};
use uuid::Uuid;

pub struct CustomRoleRepository;

impl CustomRoleRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<custom_role_model::Model>, AppError> {
        Ok(CustomRoleEntity::find_by_id(id).one(db).await?)
    }

    pub async fn find_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Uuid>,
    ) -> Result<Vec<custom_role_model::Model>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let roles = CustomRoleEntity::find()
            .filter(custom_role_model::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(roles)
    }

    // --- ユーザーへのプロジェクト単位の付与 ---

    pub async fn bind_to_user<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
        custom_role_id: Uuid,
    ) -> Result<(), AppError> {
        let existing = UserCustomRoleEntity::find_by_id((user_id, project_id, custom_role_id))
            .one(db)
            .await?;
        if existing.is_none() {
            user_custom_role_model::ActiveModel {
                user_id: Set(user_id),
                project_id: Set(project_id),
                custom_role_id: Set(custom_role_id),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// (user, project) のカスタムロール付与をすべて削除
    pub async fn unbind_all_for_project<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = UserCustomRoleEntity::delete_many()
            .filter(user_custom_role_model::Column::UserId.eq(user_id))
            .filter(user_custom_role_model::Column::ProjectId.eq(project_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn find_bound_role_ids<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows = UserCustomRoleEntity::find()
            .filter(user_custom_role_model::Column::UserId.eq(user_id))
            .filter(user_custom_role_model::Column::ProjectId.eq(project_id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.custom_role_id).collect())
    }
}
