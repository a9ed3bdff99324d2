// src/repository/mod.rs
pub mod custom_role_repository;
pub mod department_repository;
pub mod notification_repository;
pub mod project_repository;
pub mod proposal_repository;
pub mod technology_repository;
pub mod user_repository;
pub mod work_hour_repository;
