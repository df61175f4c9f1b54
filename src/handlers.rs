use axum::{
    Form,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    backend::{BackendError, BackendState},
    config::AppConfig,
    error::{PageError, SIGN_IN_PATH},
    models::{PostForm, SignInForm, SignUpForm},
    session::{self, Session},
    views,
};

const AFTER_SIGN_IN: &str = "/dashboard/posts";
const MY_POSTS: &str = "/dashboard/myposts";

/// SignInQuery
///
/// `?registered=1` is set by the sign-up redirect to show a confirmation notice.
#[derive(Deserialize, Default)]
pub struct SignInQuery {
    pub registered: Option<String>,
}

/// Splits a backend failure into a message shown inline on a form, or a
/// `PageError` for failures the form cannot recover from (session gone, post gone).
fn inline_message(error: BackendError) -> Result<String, PageError> {
    match error {
        BackendError::Rejected(message) | BackendError::Transport(message) => Ok(message),
        other => Err(PageError::from(other)),
    }
}

/// Post ids are numeric; anything else is a missing page, not a backend call.
fn parse_post_id(raw: &str) -> Result<i64, PageError> {
    raw.parse::<i64>().map_err(|_| PageError::not_found())
}

// --- Public Handlers ---

pub async fn landing() -> Html<String> {
    Html(views::landing_page())
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
}

pub async fn sign_in_form(Query(query): Query<SignInQuery>) -> Html<String> {
    let notice = query
        .registered
        .map(|_| "Account created successfully! You can now sign in.");
    Html(views::sign_in_page(&SignInForm::default(), None, notice))
}

/// sign_in
///
/// Forwards the credentials to the backend and relays the session cookie it
/// issues. Validation and backend errors re-render the form with the message.
pub async fn sign_in(
    State(backend): State<BackendState>,
    Form(form): Form<SignInForm>,
) -> Response {
    if let Err(message) = form.validate() {
        return Html(views::sign_in_page(&form, Some(message), None)).into_response();
    }

    match backend.sign_in(form.to_request()).await {
        Ok(cookies) => {
            tracing::info!(cookies = cookies.len(), "sign-in accepted by backend");
            let mut response = Redirect::to(AFTER_SIGN_IN).into_response();
            for cookie in cookies {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            response
        }
        Err(e) => {
            tracing::info!(error = %e, "sign-in rejected");
            Html(views::sign_in_page(&form, Some(&e.to_string()), None)).into_response()
        }
    }
}

pub async fn sign_up_form() -> Html<String> {
    Html(views::sign_up_page(&SignUpForm::default(), None))
}

pub async fn sign_up(
    State(backend): State<BackendState>,
    Form(form): Form<SignUpForm>,
) -> Response {
    if let Err(message) = form.validate() {
        return Html(views::sign_up_page(&form, Some(message))).into_response();
    }

    match backend.sign_up(form.to_request()).await {
        Ok(()) => Redirect::to("/auth/signin?registered=1").into_response(),
        Err(e) => {
            tracing::info!(error = %e, "sign-up rejected");
            Html(views::sign_up_page(&form, Some(&e.to_string()))).into_response()
        }
    }
}

/// logout
///
/// The only logout path. The backend is told first, but the cookie is cleared
/// whatever it answers, and the browser does a full navigation to sign-in so the
/// gate runs again.
pub async fn logout(
    State(backend): State<BackendState>,
    State(config): State<AppConfig>,
    session: Session,
) -> Response {
    if let Err(e) = backend.logout(session.token()).await {
        tracing::warn!(error = %e, "backend logout failed, clearing the cookie anyway");
    }

    let mut response = Redirect::to(SIGN_IN_PATH).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        session::clear_session_cookie(config.cookie_secure()),
    );
    response
}

// --- Dashboard Handlers ---

/// Any failure to load the profile sends the user back to sign-in with the
/// session cookie cleared.
pub async fn dashboard(State(backend): State<BackendState>, session: Session) -> Response {
    match backend.profile(session.token()).await {
        Ok(profile) => Html(views::dashboard_page(&profile)).into_response(),
        Err(e) => {
            tracing::info!(error = %e, "profile unavailable, redirecting to sign-in");
            session::rejected_redirect(SIGN_IN_PATH)
        }
    }
}

pub async fn all_posts(
    State(backend): State<BackendState>,
    session: Session,
) -> Result<Html<String>, PageError> {
    let posts = backend
        .list_posts(session.token())
        .await
        .map_err(PageError::titled("Error Loading Posts"))?;
    Ok(Html(views::all_posts_page(&posts)))
}

pub async fn my_posts(
    State(backend): State<BackendState>,
    session: Session,
) -> Result<Html<String>, PageError> {
    let posts = backend
        .my_posts(session.token())
        .await
        .map_err(PageError::titled("Error Loading Posts"))?;
    Ok(Html(views::my_posts_page(&posts, None)))
}

pub async fn post_detail(
    State(backend): State<BackendState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = parse_post_id(&raw_id)?;
    let post = backend
        .get_post(session.token(), id)
        .await
        .map_err(PageError::titled("Error Loading Post"))?;
    Ok(Html(views::post_detail_page(&post)))
}

pub async fn create_post_form() -> Html<String> {
    Html(views::create_post_page(&PostForm::default(), None))
}

pub async fn create_post(
    State(backend): State<BackendState>,
    session: Session,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    if let Err(message) = form.validate() {
        return Ok(Html(views::create_post_page(&form, Some(message))).into_response());
    }

    match backend.create_post(session.token(), form.to_payload()).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, "post created");
            Ok(Redirect::to(MY_POSTS).into_response())
        }
        Err(e) => {
            let message = inline_message(e)?;
            Ok(Html(views::create_post_page(&form, Some(&message))).into_response())
        }
    }
}

pub async fn edit_post_form(
    State(backend): State<BackendState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = parse_post_id(&raw_id)?;
    let post = backend
        .get_post(session.token(), id)
        .await
        .map_err(PageError::titled("Error Loading Post"))?;
    Ok(Html(views::edit_post_page(id, &PostForm::from(&post), None)))
}

pub async fn update_post(
    State(backend): State<BackendState>,
    session: Session,
    Path(raw_id): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let id = parse_post_id(&raw_id)?;
    if let Err(message) = form.validate() {
        return Ok(Html(views::edit_post_page(id, &form, Some(message))).into_response());
    }

    match backend.update_post(session.token(), id, form.to_payload()).await {
        Ok(_) => {
            tracing::info!(post_id = id, "post updated");
            Ok(Redirect::to(&format!("{MY_POSTS}/{id}")).into_response())
        }
        Err(e) => {
            let message = inline_message(e)?;
            Ok(Html(views::edit_post_page(id, &form, Some(&message))).into_response())
        }
    }
}

pub async fn confirm_delete(
    State(backend): State<BackendState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = parse_post_id(&raw_id)?;
    let post = backend
        .get_post(session.token(), id)
        .await
        .map_err(PageError::titled("Error Loading Post"))?;
    Ok(Html(views::confirm_delete_page(&post)))
}

/// delete_post
///
/// On a recoverable failure the list is shown again with the error above it.
pub async fn delete_post(
    State(backend): State<BackendState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_post_id(&raw_id)?;

    match backend.delete_post(session.token(), id).await {
        Ok(()) => {
            tracing::info!(post_id = id, "post deleted");
            Ok(Redirect::to(MY_POSTS).into_response())
        }
        Err(e) => {
            let message = inline_message(e)?;
            let posts = backend
                .my_posts(session.token())
                .await
                .map_err(PageError::titled("Error Loading Posts"))?;
            Ok(Html(views::my_posts_page(&posts, Some(&message))).into_response())
        }
    }
}
