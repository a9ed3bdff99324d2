// staffing-backend/src/service/availability_service.rs

use crate::api::dto::availability_dto::*;
use crate::domain::identity::CallerIdentity;
use crate::domain::work_hour_model::MAX_DAILY_WORK_HOURS;
use crate::error::{AppError, AppResult};
use crate::repository::project_repository::ProjectRepository;
use crate::repository::user_repository::UserRepository;
use crate::repository::work_hour_repository::WorkHourRepository;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 検証済みの検索条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityFilters {
    pub partially_available: bool,
    /// 締切が近いかを判定する週数（None なら判定しない）
    pub close_to_finish: Option<i64>,
    pub unavailable: bool,
}

impl AvailabilityFilters {
    pub fn from_query(query: &AvailabilityQuery) -> AppResult<Self> {
        let close_to_finish = if query.close_to_finish {
            match query.deadline_window {
                Some(window) if window >= 0 => Some(window),
                Some(_) => {
                    return Err(AppError::ValidationError(
                        "deadline_window must not be negative".to_string(),
                    ))
                }
                None => {
                    return Err(AppError::ValidationError(
                        "deadline_window is required when close_to_finish is requested"
                            .to_string(),
                    ))
                }
            }
        } else {
            None
        };

        Ok(Self {
            partially_available: query.partially_available,
            close_to_finish,
            unavailable: query.unavailable,
        })
    }
}

/// 判定に必要な従業員ごとの負荷
#[derive(Debug, Clone, Default)]
pub struct EmployeeLoad {
    pub total_hours: i32,
    pub project_count: usize,
    /// 参加中の締切ありプロジェクトの締切日
    pub deadlines: Vec<NaiveDate>,
}

/// その日を含む週の月曜日
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// 今週から締切の週までの週数（過去なら負）
pub fn weeks_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (week_start(deadline) - week_start(today)).num_days() / 7
}

/// 要求されたタグのうち該当するものを返す。空なら検索結果から除外する
pub fn classify(
    load: &EmployeeLoad,
    filters: &AvailabilityFilters,
    today: NaiveDate,
) -> Vec<AvailabilityMethod> {
    if load.project_count == 0 {
        return vec![AvailabilityMethod::Available];
    }

    let mut methods = Vec::new();

    if filters.partially_available
        && load.total_hours > 1
        && load.total_hours < MAX_DAILY_WORK_HOURS
    {
        methods.push(AvailabilityMethod::PartiallyAvailable);
    }

    if let Some(window) = filters.close_to_finish {
        let finishing = load.deadlines.iter().any(|deadline| {
            let weeks = weeks_until(*deadline, today);
            (0..window).contains(&weeks)
        });
        if finishing {
            methods.push(AvailabilityMethod::CloseToFinish);
        }
    }

    if filters.unavailable && load.total_hours >= MAX_DAILY_WORK_HOURS {
        methods.push(AvailabilityMethod::Unavailable);
    }

    methods
}

pub struct AvailabilityService {
    db: Arc<DatabaseConnection>,
}

impl AvailabilityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 組織内の従業員を空き状況で絞り込む
    pub async fn find_available_employees(
        &self,
        requester: &CallerIdentity,
        query: AvailabilityQuery,
    ) -> AppResult<Vec<AvailableEmployeeResponse>> {
        self.find_available_employees_at(requester, query, Utc::now().date_naive())
            .await
    }

    /// 基準日を指定して検索する
    pub async fn find_available_employees_at(
        &self,
        requester: &CallerIdentity,
        query: AvailabilityQuery,
        today: NaiveDate,
    ) -> AppResult<Vec<AvailableEmployeeResponse>> {
        let db = self.db.as_ref();

        let organization_id = requester
            .organization_id
            .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

        let employees = UserRepository::find_by_organization(db, organization_id).await?;
        if employees.is_empty() {
            return Err(AppError::NotFound(
                "No employees found in the organization".to_string(),
            ));
        }

        let filters = AvailabilityFilters::from_query(&query)?;

        let user_ids: Vec<Uuid> = employees.iter().map(|u| u.id).collect();
        let memberships = ProjectRepository::find_project_ids_for_users(db, &user_ids).await?;
        let mut roles = UserRepository::find_primary_roles_for_users(db, &user_ids).await?;

        let mut totals: HashMap<Uuid, i32> = HashMap::new();
        let mut hours: HashMap<(Uuid, Uuid), i32> = HashMap::new();
        for record in WorkHourRepository::find_for_users(db, &user_ids).await? {
            *totals.entry(record.user_id).or_insert(0) += record.hours;
            hours.insert((record.user_id, record.project_id), record.hours);
        }

        let mut project_ids: Vec<Uuid> = memberships.values().flatten().copied().collect();
        project_ids.sort();
        project_ids.dedup();
        let projects: HashMap<Uuid, _> = ProjectRepository::find_by_ids(db, project_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut results = Vec::new();
        for employee in employees {
            let project_summaries: Vec<EmployeeProjectSummary> = memberships
                .get(&employee.id)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| projects.get(id))
                        .map(|project| EmployeeProjectSummary {
                            id: project.id,
                            name: project.name.clone(),
                            deadline_date: project.deadline_date,
                            work_hours: hours.get(&(employee.id, project.id)).copied().unwrap_or(0),
                        })
                        .collect()
                })
                .unwrap_or_default();

            let load = EmployeeLoad {
                total_hours: totals.get(&employee.id).copied().unwrap_or(0),
                project_count: project_summaries.len(),
                deadlines: project_summaries
                    .iter()
                    .filter_map(|summary| projects.get(&summary.id))
                    .filter_map(|project| project.fixed_deadline())
                    .collect(),
            };

            let method = classify(&load, &filters, today);
            if method.is_empty() {
                continue;
            }

            results.push(AvailableEmployeeResponse {
                id: employee.id,
                username: employee.username,
                email: employee.email,
                department_id: employee.department_id,
                organization_id: employee.organization_id,
                work_hours: load.total_hours,
                projects: project_summaries,
                primary_roles: roles
                    .remove(&employee.id)
                    .map(|set| set.into_iter().collect())
                    .unwrap_or_default(),
                method,
            });
        }

        info!(
            requester = %requester.user_id,
            organization_id = %organization_id,
            matched = results.len(),
            partially_available = filters.partially_available,
            close_to_finish = ?filters.close_to_finish,
            unavailable = filters.unavailable,
            "Available employees searched"
        );

        Ok(results)
    }
}
