//! HTTP service for bet tracking and bet slip import.

pub mod auth;
pub mod config;
pub mod responses;
pub mod routes;
pub mod store;

pub use routes::{build_router, AppState};
