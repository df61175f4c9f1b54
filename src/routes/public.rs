use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Pages for anonymous visitors. `/`, `/auth/signin` and `/auth/signup` are in
/// the gate's scope, so a visitor who already holds a session cookie is sent to
/// the dashboard instead. `/health` and the logout endpoint are outside it.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Never gated.
        .route("/health", get(|| async { "ok" }))
        .route("/", get(handlers::landing))
        // GET/POST /auth/signin
        // The form posts back to itself; success relays the backend's session cookie.
        .route(
            "/auth/signin",
            get(handlers::sign_in_form).post(handlers::sign_in),
        )
        .route(
            "/auth/signup",
            get(handlers::sign_up_form).post(handlers::sign_up),
        )
        // POST /api/auth/logout
        // Clears the session cookie and redirects to sign-in.
        .route("/api/auth/logout", post(handlers::logout))
}
