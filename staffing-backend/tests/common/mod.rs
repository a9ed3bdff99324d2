// tests/common/mod.rs
pub mod app_helper;
pub mod db;
pub mod test_data;

use std::sync::Once;

static INIT: Once = Once::new();

/// テスト環境を初期化
pub fn init_test_env() {
    INIT.call_once(|| {
        if std::path::Path::new(".env.test").exists() {
            dotenvy::from_filename(".env.test").ok();
        }

        let _ = tracing_subscriber::fmt()
            .with_env_filter("staffing_backend=debug,tower_http=debug")
            .with_test_writer()
            .try_init();
    });
}
