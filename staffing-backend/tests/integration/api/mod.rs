// tests/integration/api/mod.rs

pub mod auth_tests;
pub mod workflow_api_tests;
