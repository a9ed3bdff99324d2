// src/repository/department_repository.rs

use crate::domain::department_model::{self, Entity as DepartmentEntity};
use crate::error::AppError;
use sea_orm::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct DepartmentRepository;

impl DepartmentRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<department_model::Model>, AppError> {
        Ok(DepartmentEntity::find_by_id(id).one(db).await?)
    }

    /// ユーザーが管理している部門（一意インデックスにより最大1件）
    pub async fn find_managed_by<C: ConnectionTrait>(
        db: &C,
        manager_id: Uuid,
    ) -> Result<Option<department_model::Model>, AppError> {
        let department = DepartmentEntity::find()
            .filter(department_model::Column::ManagerId.eq(manager_id))
            .one(db)
            .await?;
        Ok(department)
    }
}
