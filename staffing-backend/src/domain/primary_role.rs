// staffing-backend/src/domain/primary_role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 組織全体で有効な主ロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryRole {
    Employee,
    ProjectManager,
    DepartmentManager,
    OrganizationAdmin,
}

impl PrimaryRole {
    /// 文字列からPrimaryRoleに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "project_manager" => Some(Self::ProjectManager),
            "department_manager" => Some(Self::DepartmentManager),
            "organization_admin" => Some(Self::OrganizationAdmin),
            _ => None,
        }
    }

    /// DB に保存する文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::ProjectManager => "project_manager",
            Self::DepartmentManager => "department_manager",
            Self::OrganizationAdmin => "organization_admin",
        }
    }
}

impl fmt::Display for PrimaryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PrimaryRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid primary role: {}", s))
    }
}
