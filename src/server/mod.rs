//! Axum-based HTTP server for the relay.
//!
//! # Components
//!
//! - `handlers`: `/analyze`, `/health` and `/metrics` endpoints.
//! - `middleware`: request ID tracking and CORS.
//! - `routes`: The router that ties everything together.

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, IMAGE_FIELD};
pub use routes::{create_router, AppState};
