// staffing-backend/src/service/notification_service.rs

use crate::api::dto::notification_dto::NotificationResponse;
use crate::config::NotificationConfig;
use crate::domain::identity::CallerIdentity;
use crate::error::{AppError, AppResult};
use crate::repository::notification_repository::NotificationRepository;
use crate::with_transaction;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// 部門マネージャー宛て通知の読み出し
///
/// 配送は at-least-once。取得と同時に送信済みにする。
pub struct NotificationService {
    db: Arc<DatabaseConnection>,
    config: NotificationConfig,
}

impl NotificationService {
    pub fn new(db: Arc<DatabaseConnection>, config: NotificationConfig) -> Self {
        Self { db, config }
    }

    /// 自分宛ての通知をすべて返し、未送信のものを送信済みにする
    ///
    /// 返す `sent` は更新前の値。
    pub async fn list_notifications(
        &self,
        caller: &CallerIdentity,
    ) -> AppResult<Vec<NotificationResponse>> {
        let manager_id = caller.user_id;
        with_transaction!(self.db, |txn| async move {
            let notifications = NotificationRepository::find_for_manager(txn, manager_id).await?;
            let unsent: Vec<Uuid> = notifications
                .iter()
                .filter(|n| !n.sent)
                .map(|n| n.id)
                .collect();
            NotificationRepository::mark_sent(txn, unsent).await?;

            Ok(notifications.into_iter().map(Into::into).collect())
        })
    }

    /// 未送信の通知が届くまで待つ
    ///
    /// タイムアウトは設定値を上限とし、時間切れなら空の一覧を返す。
    pub async fn poll_notifications(
        &self,
        caller: &CallerIdentity,
        timeout: Option<Duration>,
    ) -> AppResult<Vec<NotificationResponse>> {
        let limit = self.config.poll_timeout;
        let timeout = timeout.map_or(limit, |t| t.min(limit));
        let deadline = Instant::now() + timeout;

        loop {
            let delivered = self.take_unsent(caller.user_id).await?;
            if !delivered.is_empty() {
                info!(
                    manager_id = %caller.user_id,
                    count = delivered.len(),
                    "Notifications delivered"
                );
                return Ok(delivered);
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(manager_id = %caller.user_id, "Notification poll timed out");
                return Ok(Vec::new());
            }
            tokio::time::sleep(self.config.poll_interval.min(deadline - now)).await;
        }
    }

    /// 自分宛ての通知を1件削除
    pub async fn delete_notification(
        &self,
        caller: &CallerIdentity,
        notification_id: Uuid,
    ) -> AppResult<()> {
        let deleted = NotificationRepository::delete_for_manager(
            self.db.as_ref(),
            notification_id,
            caller.user_id,
        )
        .await?;
        if !deleted {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        info!(
            notification_id = %notification_id,
            manager_id = %caller.user_id,
            "Notification deleted"
        );
        Ok(())
    }

    async fn take_unsent(&self, manager_id: Uuid) -> AppResult<Vec<NotificationResponse>> {
        with_transaction!(self.db, |txn| async move {
            let unsent = NotificationRepository::find_unsent_for_manager(txn, manager_id).await?;
            NotificationRepository::mark_sent(txn, unsent.iter().map(|n| n.id).collect()).await?;
            Ok(unsent.into_iter().map(Into::into).collect())
        })
    }
}
