//! Session cookie handling.
//!
//! The `accessToken` cookie is issued by the backend on sign-in. This server
//! reads it (gate, backend forwarding) and clears it on logout or when the
//! backend refuses it.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "accessToken";

/// Session
///
/// Handler argument carrying the caller's `accessToken`, if any. Extraction never
/// fails and never validates the token: handlers forward it to the backend, which
/// answers 401/403 when it is no good.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session(pub Option<String>);

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session(session_token(&parts.headers)))
    }
}

/// Returns the first non-empty `accessToken` value across all `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// `Cookie` header value used to forward a session token to the backend.
pub fn cookie_header(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}")
}

const CLEARED: &str =
    "accessToken=; HttpOnly; SameSite=Lax; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0";
const CLEARED_SECURE: &str = "accessToken=; HttpOnly; SameSite=Lax; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Secure";

/// clear_session_cookie
///
/// Re-sets the cookie with an empty value and an already-expired date. The
/// attributes must match the ones the backend issues or the browser keeps the
/// original cookie.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    HeaderValue::from_static(if secure { CLEARED_SECURE } else { CLEARED })
}

/// Response marker: the backend refused this session, so the cookie has to go.
#[derive(Debug, Clone, Copy)]
pub struct SessionRejected;

/// 303 to `target` carrying the `SessionRejected` marker. Without clearing the
/// cookie the gate would bounce the browser straight back to the dashboard.
pub fn rejected_redirect(target: &str) -> Response {
    let mut response = Redirect::to(target).into_response();
    response.extensions_mut().insert(SessionRejected);
    response
}

/// expire_rejected_session
///
/// Response mapper installed on the router: appends the clearing `Set-Cookie`
/// to any response marked `SessionRejected`.
pub async fn expire_rejected_session(
    State(config): State<AppConfig>,
    mut response: Response,
) -> Response {
    if response.extensions_mut().remove::<SessionRejected>().is_some() {
        response.headers_mut().append(
            header::SET_COOKIE,
            clear_session_cookie(config.cookie_secure()),
        );
    }
    response
}
