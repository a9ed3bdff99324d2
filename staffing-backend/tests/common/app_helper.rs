// tests/common/app_helper.rs

use axum::Router;
use staffing_backend::api::{create_app, AppState};
use staffing_backend::config::AppConfig;

use crate::common::{self, db::TestDatabase, test_data::Scenario};

/// アプリ全体と基本データのセットアップ
pub async fn setup_app() -> (Router, AppState, Scenario, TestDatabase) {
    setup_app_with_config(AppConfig::for_testing()).await
}

pub async fn setup_app_with_config(config: AppConfig) -> (Router, AppState, Scenario, TestDatabase) {
    common::init_test_env();

    let db = TestDatabase::new().await;
    let scenario = Scenario::new(db.connection.clone()).await;
    let state = AppState::new(db.connection.clone(), &config).unwrap();
    let app = create_app(state.clone());

    (app, state, scenario, db)
}
