// src/repository/user_repository.rs

use crate::domain::primary_role::PrimaryRole;
use crate::domain::user_model::{self, Entity as UserEntity};
use crate::domain::user_primary_role_model::{self, Entity as UserPrimaryRoleEntity};
use crate::error::AppError;
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    /// ユーザーをIDで検索
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<user_model::Model>, AppError> {
        Ok(UserEntity::find_by_id(id).one(db).await?)
    }

    /// 組織に所属する全ユーザー（ユーザー名順）
    pub async fn find_by_organization<C: ConnectionTrait>(
        db: &C,
        organization_id: Uuid,
    ) -> Result<Vec<user_model::Model>, AppError> {
        let users = UserEntity::find()
            .filter(user_model::Column::OrganizationId.eq(organization_id))
            .order_by_asc(user_model::Column::Username)
            .all(db)
            .await?;
        Ok(users)
    }

    pub async fn find_by_department<C: ConnectionTrait>(
        db: &C,
        department_id: Uuid,
    ) -> Result<Vec<user_model::Model>, AppError> {
        let users = UserEntity::find()
            .filter(user_model::Column::DepartmentId.eq(department_id))
            .order_by_asc(user_model::Column::Username)
            .all(db)
            .await?;
        Ok(users)
    }

    // --- 主ロール ---

    /// ユーザーの主ロール一覧
    pub async fn find_primary_roles<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<BTreeSet<PrimaryRole>, AppError> {
        let grants = UserPrimaryRoleEntity::find()
            .filter(user_primary_role_model::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        Ok(grants.iter().filter_map(parse_grant).collect())
    }

    /// 複数ユーザーの主ロールをまとめて取得
    pub async fn find_primary_roles_for_users<C: ConnectionTrait>(
        db: &C,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, BTreeSet<PrimaryRole>>, AppError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let grants = UserPrimaryRoleEntity::find()
            .filter(user_primary_role_model::Column::UserId.is_in(user_ids.to_vec()))
            .all(db)
            .await?;

        let mut roles: HashMap<Uuid, BTreeSet<PrimaryRole>> = HashMap::new();
        for grant in &grants {
            if let Some(role) = parse_grant(grant) {
                roles.entry(grant.user_id).or_default().insert(role);
            }
        }
        Ok(roles)
    }

    /// 主ロールを付与（付与済みなら何もしない）
    pub async fn grant_primary_role<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        role: PrimaryRole,
    ) -> Result<(), AppError> {
        let existing = UserPrimaryRoleEntity::find_by_id((user_id, role.as_str().to_string()))
            .one(db)
            .await?;
        if existing.is_none() {
            user_primary_role_model::ActiveModel {
                user_id: Set(user_id),
                role: Set(role.as_str().to_string()),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    pub async fn revoke_primary_role<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        role: PrimaryRole,
    ) -> Result<bool, AppError> {
        let result = UserPrimaryRoleEntity::delete_by_id((user_id, role.as_str().to_string()))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

fn parse_grant(grant: &user_primary_role_model::Model) -> Option<PrimaryRole> {
    let role = PrimaryRole::from_str(&grant.role);
    if role.is_none() {
        warn!(user_id = %grant.user_id, role = %grant.role, "Unknown primary role grant ignored");
    }
    role
}
