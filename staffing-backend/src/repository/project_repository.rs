// src/repository/project_repository.rs

use crate::domain::project_custom_role_model::{self, Entity as ProjectCustomRoleEntity};
use crate::domain::project_deallocated_user_model::{
    self, Entity as ProjectDeallocatedUserEntity,
};
use crate::domain::project_model::{self, Entity as ProjectEntity};
use crate::domain::project_user_model::{self, Entity as ProjectUserEntity};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use uuid::Uuid;

pub struct ProjectRepository;

impl ProjectRepository {
    // --- プロジェクト本体 ---

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<project_model::Model>, AppError> {
        Ok(ProjectEntity::find_by_id(id).one(db).await?)
    }

    pub async fn find_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Uuid>,
    ) -> Result<Vec<project_model::Model>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let projects = ProjectEntity::find()
            .filter(project_model::Column::Id.is_in(ids))
            .order_by_asc(project_model::Column::Name)
            .all(db)
            .await?;
        Ok(projects)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        project: project_model::ActiveModel,
    ) -> Result<project_model::Model, AppError> {
        Ok(project.insert(db).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        mut project: project_model::ActiveModel,
    ) -> Result<project_model::Model, AppError> {
        project.updated_at = Set(Utc::now());
        Ok(project.update(db).await?)
    }

    /// メンバー・台帳・提案・通知は外部キーのカスケードで削除される
    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, AppError> {
        let result = ProjectEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    // --- 現メンバー ---

    pub async fn is_member<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AppError> {
        let count = ProjectUserEntity::find()
            .filter(project_user_model::Column::ProjectId.eq(project_id))
            .filter(project_user_model::Column::UserId.eq(user_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn add_member<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        project_user_model::ActiveModel {
            project_id: Set(project_id),
            user_id: Set(user_id),
            joined_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(|e| AppError::from_db_with_conflict(e, "User is already part of the project"))?;
        Ok(())
    }

    pub async fn remove_member<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = ProjectUserEntity::delete_by_id((project_id, user_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find_member_ids<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let members = ProjectUserEntity::find()
            .filter(project_user_model::Column::ProjectId.eq(project_id))
            .order_by_asc(project_user_model::Column::JoinedAt)
            .all(db)
            .await?;
        Ok(members.into_iter().map(|m| m.user_id).collect())
    }

    /// 複数ユーザーの参加中プロジェクトIDをまとめて取得
    pub async fn find_project_ids_for_users<C: ConnectionTrait>(
        db: &C,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, AppError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let memberships = ProjectUserEntity::find()
            .filter(project_user_model::Column::UserId.is_in(user_ids.to_vec()))
            .all(db)
            .await?;

        let mut projects: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for membership in memberships {
            projects
                .entry(membership.user_id)
                .or_default()
                .push(membership.project_id);
        }
        Ok(projects)
    }

    // --- 解除済みメンバー ---

    /// 解除履歴に追加（既にあれば何もしない）
    pub async fn add_deallocated_member<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let existing = ProjectDeallocatedUserEntity::find_by_id((project_id, user_id))
            .one(db)
            .await?;
        if existing.is_none() {
            project_deallocated_user_model::ActiveModel {
                project_id: Set(project_id),
                user_id: Set(user_id),
                deallocated_at: Set(Utc::now()),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    pub async fn find_deallocated_member_ids<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows = ProjectDeallocatedUserEntity::find()
            .filter(project_deallocated_user_model::Column::ProjectId.eq(project_id))
            .order_by_asc(project_deallocated_user_model::Column::DeallocatedAt)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    // --- カスタムロール ---

    pub async fn has_custom_role<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        custom_role_id: Uuid,
    ) -> Result<bool, AppError> {
        let found = ProjectCustomRoleEntity::find_by_id((project_id, custom_role_id))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// プロジェクトにカスタムロールを紐付ける（紐付け済みなら何もしない）
    pub async fn attach_custom_role<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        custom_role_id: Uuid,
    ) -> Result<bool, AppError> {
        if Self::has_custom_role(db, project_id, custom_role_id).await? {
            return Ok(false);
        }
        project_custom_role_model::ActiveModel {
            project_id: Set(project_id),
            custom_role_id: Set(custom_role_id),
        }
        .insert(db)
        .await?;
        Ok(true)
    }

    pub async fn find_custom_role_ids<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows = ProjectCustomRoleEntity::find()
            .filter(project_custom_role_model::Column::ProjectId.eq(project_id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.custom_role_id).collect())
    }
}
