// staffing-backend/src/api/dto/project_dto.rs

use crate::domain::project_model::Model as Project;
use crate::domain::project_status::{ProjectPeriod, ProjectStatus};
use crate::domain::technology_model::Model as Technology;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// プロジェクト作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: String,

    pub period: ProjectPeriod,

    pub start_date: NaiveDate,

    pub deadline_date: Option<NaiveDate>,

    /// 省略時は NotStarted
    pub status: Option<ProjectStatus>,

    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

/// プロジェクト更新リクエスト
///
/// 期間を Ongoing に変更した場合、既存の締切は破棄される。
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub period: Option<ProjectPeriod>,

    pub start_date: Option<NaiveDate>,

    pub deadline_date: Option<NaiveDate>,

    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: String,
    pub period: String,
    pub start_date: NaiveDate,
    pub deadline_date: Option<NaiveDate>,
    pub status: String,
    pub role_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    pub fn from_model(project: Project, role_ids: Vec<Uuid>) -> Self {
        Self {
            id: project.id,
            organization_id: project.organization_id,
            name: project.name,
            description: project.description,
            period: project.period,
            start_date: project.start_date,
            deadline_date: project.deadline_date,
            status: project.status,
            role_ids,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRoleAttachmentResponse {
    pub project_id: Uuid,
    pub custom_role_id: Uuid,
    /// 今回新たに紐付けた場合 true
    pub attached: bool,
}

/// 技術スタックの登録リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTechnologyRequest {
    #[validate(length(min = 1, max = 100, message = "Technology name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Technology> for TechnologyResponse {
    fn from(technology: Technology) -> Self {
        Self {
            id: technology.id,
            organization_id: technology.organization_id,
            name: technology.name,
            created_at: technology.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyAssignmentResponse {
    pub project_id: Uuid,
    pub technology_id: Uuid,
    /// 今回の操作で割り当てが変化した場合 true
    pub changed: bool,
}
