// src/api/dto/mod.rs
pub mod availability_dto;
pub mod common;
pub mod notification_dto;
pub mod project_dto;
pub mod proposal_dto;

pub use common::{ApiResponse, OperationResult};
