// staffing-backend/src/utils/mod.rs

pub mod jwt;
pub mod transaction;
pub mod validation;
