// src/service/mod.rs
pub mod availability_service;
pub mod identity_service;
pub mod notification_service;
pub mod project_service;
pub mod proposal_service;
