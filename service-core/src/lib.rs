//! service-core: Shared infrastructure for the counter and message services.
pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod middleware;
pub mod observability;

pub use async_trait;
pub use axum;
pub use mongodb;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
