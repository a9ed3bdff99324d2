// staffing-backend/src/api/mod.rs

use crate::config::AppConfig;
use crate::error::AppError;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{HasIdentityProvider, HasJwtManager};
use crate::service::{
    availability_service::AvailabilityService,
    identity_service::{DirectoryIdentityProvider, IdentityProvider},
    notification_service::NotificationService,
    project_service::ProjectService,
    proposal_service::ProposalService,
};
use crate::utils::jwt::JwtManager;
use axum::{middleware as axum_middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub proposal_service: Arc<ProposalService>,
    pub availability_service: Arc<AvailabilityService>,
    pub project_service: Arc<ProjectService>,
    pub notification_service: Arc<NotificationService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub jwt_manager: Arc<JwtManager>,
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// 設定からサービス群を組み立てる
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Result<Self, AppError> {
        let jwt_manager = JwtManager::new(config.jwt.clone())
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self {
            proposal_service: Arc::new(ProposalService::new(
                db.clone(),
                config.workflow.clone(),
            )),
            availability_service: Arc::new(AvailabilityService::new(db.clone())),
            project_service: Arc::new(ProjectService::new(db.clone())),
            notification_service: Arc::new(NotificationService::new(
                db.clone(),
                config.notifications.clone(),
            )),
            identity_provider: Arc::new(DirectoryIdentityProvider::new(db.clone())),
            jwt_manager: Arc::new(jwt_manager),
            db,
            config: Arc::new(config.clone()),
        })
    }

    /// 識別情報の解決手段を差し替える
    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = provider;
        self
    }
}

impl HasJwtManager for AppState {
    fn jwt_manager(&self) -> &Arc<JwtManager> {
        &self.jwt_manager
    }
}

impl HasIdentityProvider for AppState {
    fn identity_provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity_provider
    }
}

/// 全ルートとミドルウェアを組み立てる
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .merge(handlers::proposal_handler::proposal_router(app_state.clone()))
        .merge(handlers::availability_handler::availability_router(app_state.clone()))
        .merge(handlers::project_handler::project_router(app_state.clone()))
        .merge(handlers::notification_handler::notification_router(app_state.clone()))
        .merge(handlers::system_handler::system_router(app_state))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
}
