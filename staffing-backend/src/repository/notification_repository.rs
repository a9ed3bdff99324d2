// src/repository/notification_repository.rs

use crate::domain::notification_model::{self, Entity as NotificationEntity, NotificationType};
use crate::error::AppError;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct NotificationRepository;

impl NotificationRepository {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        notification_type: NotificationType,
        to_manager: Uuid,
        for_user: Uuid,
        project_id: Uuid,
    ) -> Result<notification_model::Model, AppError> {
        let notification = notification_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            notification_type: Set(notification_type.as_str().to_string()),
            to_manager: Set(to_manager),
            for_user: Set(for_user),
            project_id: Set(project_id),
            sent: Set(false),
            created_at: Set(Utc::now()),
        };
        Ok(notification.insert(db).await?)
    }

    pub async fn find_for_manager<C: ConnectionTrait>(
        db: &C,
        manager_id: Uuid,
    ) -> Result<Vec<notification_model::Model>, AppError> {
        let notifications = NotificationEntity::find()
            .filter(notification_model::Column::ToManager.eq(manager_id))
            .order_by_asc(notification_model::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(notifications)
    }

    pub async fn find_unsent_for_manager<C: ConnectionTrait>(
        db: &C,
        manager_id: Uuid,
    ) -> Result<Vec<notification_model::Model>, AppError> {
        let notifications = NotificationEntity::find()
            .filter(notification_model::Column::ToManager.eq(manager_id))
            .filter(notification_model::Column::Sent.eq(false))
            .order_by_asc(notification_model::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(notifications)
    }

    pub async fn mark_sent<C: ConnectionTrait>(db: &C, ids: Vec<Uuid>) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = NotificationEntity::update_many()
            .col_expr(notification_model::Column::Sent, Expr::value(true))
            .filter(notification_model::Column::Id.is_in(ids))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// 宛先が一致する通知のみ削除する
    pub async fn delete_for_manager<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        manager_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = NotificationEntity::delete_many()
            .filter(notification_model::Column::Id.eq(id))
            .filter(notification_model::Column::ToManager.eq(manager_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
