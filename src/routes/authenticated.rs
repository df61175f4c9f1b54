use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// The dashboard. Every path here starts with `/dashboard`, the gate's protected
/// prefix: without a session cookie the request never reaches these handlers, and
/// with one the response is marked non-cacheable.
///
/// Handlers forward the session token to the backend and turn a 401/403 from it
/// into a redirect to sign-in (see `PageError`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/dashboard", get(handlers::dashboard))
        // GET /dashboard/posts
        // Every user's posts.
        .route("/dashboard/posts", get(handlers::all_posts))
        // GET /dashboard/myposts
        // The signed-in user's posts with view/edit/delete actions.
        .route("/dashboard/myposts", get(handlers::my_posts))
        // Static segment; takes priority over the `{id}` routes below.
        .route(
            "/dashboard/myposts/create-post",
            get(handlers::create_post_form).post(handlers::create_post),
        )
        .route("/dashboard/myposts/{id}", get(handlers::post_detail))
        .route(
            "/dashboard/myposts/{id}/edit",
            get(handlers::edit_post_form).post(handlers::update_post),
        )
        // GET shows the confirmation dialog, POST performs the delete.
        .route(
            "/dashboard/myposts/{id}/delete",
            get(handlers::confirm_delete).post(handlers::delete_post),
        )
}
