//! Credit card recommendations by purchase category.
//!
//! The scoring lives in [`services::recommendations`]. Everything else is the
//! storage and HTTP plumbing around it.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{create_router, AppState};
