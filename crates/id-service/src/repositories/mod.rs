//! Database access layer.
//!
//! Repositories own all SQL; services never build queries. Every function
//! takes the pool (or a transaction) explicitly and maps driver errors to
//! `AuthError::Database`.

pub mod roles;
pub mod users;
