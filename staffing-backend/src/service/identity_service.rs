// staffing-backend/src/service/identity_service.rs

use crate::domain::identity::CallerIdentity;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 検証済みのユーザーIDから呼び出し元の識別情報を解決する
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, user_id: Uuid) -> AppResult<CallerIdentity>;
}

/// ディレクトリ（users / user_primary_roles）を参照する実装
pub struct DirectoryIdentityProvider {
    db: Arc<DatabaseConnection>,
}

impl DirectoryIdentityProvider {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityProvider for DirectoryIdentityProvider {
    async fn resolve(&self, user_id: Uuid) -> AppResult<CallerIdentity> {
        let user = UserRepository::find_by_id(self.db.as_ref(), user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
        let primary_roles = UserRepository::find_primary_roles(self.db.as_ref(), user_id).await?;

        debug!(
            user_id = %user.id,
            roles = primary_roles.len(),
            "Resolved caller identity"
        );

        Ok(CallerIdentity {
            user_id: user.id,
            organization_id: user.organization_id,
            department_id: user.department_id,
            primary_roles,
        })
    }
}
