//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Request bodies are tiny JSON objects.
const BODY_LIMIT: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
///
/// `/ip` and `/geturl` answer any method. `/notify` and `/puturl` are
/// POST-only and sit behind the shared-secret gate, which wraps the whole
/// method router so it runs before the method check.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/ip", any(handlers::ip))
        .route("/geturl", any(handlers::get_url));

    let protected_routes = Router::new()
        .route(
            "/notify",
            post(handlers::notify).fallback(handlers::method_not_allowed),
        )
        .route(
            "/puturl",
            post(handlers::put_url).fallback(handlers::method_not_allowed),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ));

    public_routes
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
