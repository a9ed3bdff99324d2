// staffing-backend/src/api/dto/availability_dto.rs

use crate::domain::primary_role::PrimaryRole;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 空き状況検索の条件（クエリ文字列）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub partially_available: bool,
    #[serde(default)]
    pub close_to_finish: bool,
    /// 締切までの週数のしきい値
    pub deadline_window: Option<i64>,
    #[serde(default)]
    pub unavailable: bool,
}

/// 従業員に付くタグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityMethod {
    PartiallyAvailable,
    CloseToFinish,
    Unavailable,
    Available,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub deadline_date: Option<NaiveDate>,
    pub work_hours: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableEmployeeResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub department_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    /// 確保済み工数の合計
    pub work_hours: i32,
    pub projects: Vec<EmployeeProjectSummary>,
    pub primary_roles: Vec<PrimaryRole>,
    pub method: Vec<AvailabilityMethod>,
}

impl AvailableEmployeeResponse {
    pub fn has_method(&self, method: AvailabilityMethod) -> bool {
        self.method.contains(&method)
    }
}
