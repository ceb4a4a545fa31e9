//! Business logic layer.

pub mod auth_service;
pub mod seed_service;
pub mod token_service;
pub mod user_service;
