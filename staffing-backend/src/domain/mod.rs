// src/domain/mod.rs
pub mod allocation_proposal_model;
pub mod allocation_proposal_role_model;
pub mod custom_role_model;
pub mod deallocation_proposal_model;
pub mod department_model;
pub mod identity;
pub mod notification_model;
pub mod organization_model;
pub mod primary_role;
pub mod project_custom_role_model;
pub mod project_deallocated_user_model;
pub mod project_model;
pub mod project_status;
pub mod project_technology_model;
pub mod project_user_model;
pub mod proposal_state;
pub mod technology_model;
pub mod user_custom_role_model;
pub mod user_model;
pub mod user_primary_role_model;
pub mod work_hour_model;
