// src/repository/work_hour_repository.rs

use crate::domain::work_hour_model::{self, Entity as WorkHourEntity};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{ConnectionTrait, QueryFilter};
use uuid::Uuid;

/// 工数台帳
///
/// 合計工数は常にレコードから都度集計し、ユーザー行には保持しない。
pub struct WorkHourRepository;

impl WorkHourRepository {
    pub async fn record<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
        hours: i32,
    ) -> Result<work_hour_model::Model, AppError> {
        let record = work_hour_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            project_id: Set(project_id),
            hours: Set(hours),
            created_at: Set(Utc::now()),
        };
        record.insert(db).await.map_err(|e| {
            AppError::from_db_with_conflict(e, "Work hours are already recorded for this project")
        })
    }

    pub async fn remove<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = WorkHourEntity::delete_many()
            .filter(work_hour_model::Column::UserId.eq(user_id))
            .filter(work_hour_model::Column::ProjectId.eq(project_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<work_hour_model::Model>, AppError> {
        let record = WorkHourEntity::find()
            .filter(work_hour_model::Column::UserId.eq(user_id))
            .filter(work_hour_model::Column::ProjectId.eq(project_id))
            .one(db)
            .await?;
        Ok(record)
    }

    pub async fn find_for_users<C: ConnectionTrait>(
        db: &C,
        user_ids: &[Uuid],
    ) -> Result<Vec<work_hour_model::Model>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = WorkHourEntity::find()
            .filter(work_hour_model::Column::UserId.is_in(user_ids.to_vec()))
            .all(db)
            .await?;
        Ok(records)
    }

    /// ユーザーの合計確保工数
    pub async fn sum_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<i32, AppError> {
        let records = Self::find_for_users(db, &[user_id]).await?;
        Ok(records.iter().map(|r| r.hours).sum())
    }
}
