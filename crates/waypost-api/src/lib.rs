//! Waypost API crate - axum HTTP server, route handlers, listeners.
//!
//! Provides the IP echo, notification relay and tag-to-URL endpoints,
//! the shared-secret auth gate, and the plaintext/TLS listener bootstrap.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
