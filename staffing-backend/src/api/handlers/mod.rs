// src/api/handlers/mod.rs
pub mod availability_handler;
pub mod notification_handler;
pub mod project_handler;
pub mod proposal_handler;
pub mod system_handler;
