use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{backend::BackendError, session, views};

pub const SIGN_IN_PATH: &str = "/auth/signin";

/// PageError
///
/// A backend failure surfaced by a page handler, together with the heading the
/// error page should carry. Handlers return `Result<Response, PageError>` and
/// bubble backend errors up with `?`.
#[derive(Debug)]
pub struct PageError {
    pub heading: &'static str,
    pub source: BackendError,
}

impl PageError {
    pub fn new(heading: &'static str, source: BackendError) -> Self {
        Self { heading, source }
    }

    /// Attaches a heading to a backend result; used as `.map_err(PageError::titled(...))`.
    pub fn titled(heading: &'static str) -> impl FnOnce(BackendError) -> Self {
        move |source| Self::new(heading, source)
    }

    /// A missing page rather than a failed backend call (e.g. a non-numeric post id).
    pub fn not_found() -> Self {
        Self::new("Not Found", BackendError::NotFound)
    }
}

impl From<BackendError> for PageError {
    fn from(source: BackendError) -> Self {
        Self::new("Something went wrong", source)
    }
}

/// The backend is the source of truth for sessions: a 401/403 there sends the
/// browser to sign-in even though the gate let the request through, and the
/// stale cookie is cleared on the way.
impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.source {
            BackendError::Unauthorized => {
                tracing::info!("backend rejected the session, redirecting to sign-in");
                session::rejected_redirect(SIGN_IN_PATH)
            }
            BackendError::NotFound => {
                (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
            }
            BackendError::Rejected(message) | BackendError::Transport(message) => {
                tracing::warn!(heading = self.heading, error = %message, "page failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Html(views::error_page(self.heading, &message)),
                )
                    .into_response()
            }
        }
    }
}
