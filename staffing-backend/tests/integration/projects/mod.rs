// tests/integration/projects/mod.rs

pub mod project_tests;
