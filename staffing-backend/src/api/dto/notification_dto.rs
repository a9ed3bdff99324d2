// staffing-backend/src/api/dto/notification_dto.rs

use crate::domain::notification_model::{Model as Notification, NotificationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub notification_type: Option<NotificationType>,
    pub for_user: Uuid,
    pub project_id: Uuid,
    /// 今回の取得より前に配送済みだったか
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            notification_type: notification.get_type(),
            for_user: notification.for_user,
            project_id: notification.project_id,
            sent: notification.sent,
            created_at: notification.created_at,
        }
    }
}

/// ロングポーリングのクエリ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollQuery {
    /// 待機時間（秒）。設定値を上限とする
    pub timeout_secs: Option<u64>,
}
