use async_trait::async_trait;
use axum::http::{HeaderValue, Method, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};
use thiserror::Error;

use crate::{
    models::{ErrorBody, ErrorMessage, Post, PostPayload, SignInRequest, SignUpRequest, UserProfile},
    session,
};

/// BackendError
///
/// Typed failure of a single backend round trip. Nothing is retried; the caller
/// decides how the failure is shown.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// 401 or 403 on a session-bound call.
    #[error("not authenticated")]
    Unauthorized,

    /// 404.
    #[error("resource not found")]
    NotFound,

    /// Any other non-success status, carrying the backend's `message`.
    #[error("{0}")]
    Rejected(String),

    /// Connection failure, timeout, or a body that could not be decoded.
    #[error("{0}")]
    Transport(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

const CONNECT_FAILED: &str = "Failed to connect to the server. Please try again.";
const BAD_RESPONSE: &str = "Unexpected response from the server.";

// 1. PostsBackend Contract
/// PostsBackend
///
/// Everything the front end asks of the external backend. Session-bound calls
/// take the caller's `accessToken` and forward it as a cookie; the backend is the
/// only authority on whether that token is valid.
///
/// Implemented by `HttpBackend` in production and by stubs in tests.
#[async_trait]
pub trait PostsBackend: Send + Sync {
    /// `POST /auth/signin`. Returns the `Set-Cookie` headers to relay to the browser.
    async fn sign_in(&self, request: SignInRequest) -> BackendResult<Vec<HeaderValue>>;

    /// `POST /auth/signup`.
    async fn sign_up(&self, request: SignUpRequest) -> BackendResult<()>;

    /// `POST /auth/logout`.
    async fn logout(&self, token: Option<&str>) -> BackendResult<()>;

    /// `GET /users/profile`.
    async fn profile(&self, token: Option<&str>) -> BackendResult<UserProfile>;

    /// `GET /posts`.
    async fn list_posts(&self, token: Option<&str>) -> BackendResult<Vec<Post>>;

    /// `GET /posts/my`.
    async fn my_posts(&self, token: Option<&str>) -> BackendResult<Vec<Post>>;

    /// `GET /posts/{id}`.
    async fn get_post(&self, token: Option<&str>, id: i64) -> BackendResult<Post>;

    /// `POST /posts`.
    async fn create_post(&self, token: Option<&str>, payload: PostPayload) -> BackendResult<Post>;

    /// `PATCH /posts/{id}`.
    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        payload: PostPayload,
    ) -> BackendResult<Post>;

    /// `DELETE /posts/{id}`.
    async fn delete_post(&self, token: Option<&str>, id: i64) -> BackendResult<()>;
}

/// BackendState
///
/// The concrete type used to share backend access across the application state.
pub type BackendState = Arc<dyn PostsBackend>;

/// How 401/403 are read for a call.
#[derive(Clone, Copy, PartialEq)]
enum Auth {
    // Credential submission: a 401 is a wrong password, shown inline.
    Credentials,
    // Anything carrying the session cookie: 401/403 mean the session is gone.
    Session,
}

// 2. The Real Implementation
/// HttpBackend
///
/// reqwest client against the backend base URL. One client is shared by all
/// requests and pools connections internally.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(header::ACCEPT, "application/json");

        match token {
            Some(token) => builder.header(header::COOKIE, session::cookie_header(token)),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        auth: Auth,
        fallback: &str,
    ) -> BackendResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "backend request failed");
            BackendError::Transport(CONNECT_FAILED.to_string())
        })?;

        classify(response, auth, fallback).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        fallback: &str,
    ) -> BackendResult<T> {
        let response = self
            .send(self.request(Method::GET, path, token), Auth::Session, fallback)
            .await?;
        decode(response).await
    }

    async fn submit<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
        fallback: &str,
    ) -> BackendResult<T> {
        let builder = self.request(method, path, token).json(body);
        let response = self.send(builder, Auth::Session, fallback).await?;
        decode(response).await
    }
}

/// Maps a response status onto `BackendError`, reading the backend's `message`
/// for rejections.
async fn classify(
    response: reqwest::Response,
    auth: Auth,
    fallback: &str,
) -> BackendResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    tracing::debug!(status = status.as_u16(), "backend returned an error status");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if auth == Auth::Session => {
            Err(BackendError::Unauthorized)
        }
        StatusCode::NOT_FOUND if auth == Auth::Session => Err(BackendError::NotFound),
        _ => {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .map(ErrorMessage::into_text)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            Err(BackendError::Rejected(message))
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
    response.json::<T>().await.map_err(|e| {
        tracing::warn!(error = %e, "backend response could not be decoded");
        BackendError::Transport(BAD_RESPONSE.to_string())
    })
}

fn set_cookies(response: &reqwest::Response) -> Vec<HeaderValue> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .cloned()
        .collect()
}

#[async_trait]
impl PostsBackend for HttpBackend {
    async fn sign_in(&self, request: SignInRequest) -> BackendResult<Vec<HeaderValue>> {
        let builder = self.request(Method::POST, "/auth/signin", None).json(&request);
        let response = self
            .send(builder, Auth::Credentials, "An unexpected error occurred during sign in.")
            .await?;
        Ok(set_cookies(&response))
    }

    async fn sign_up(&self, request: SignUpRequest) -> BackendResult<()> {
        let builder = self.request(Method::POST, "/auth/signup", None).json(&request);
        self.send(builder, Auth::Credentials, "An unexpected error occurred during signup.")
            .await?;
        Ok(())
    }

    async fn logout(&self, token: Option<&str>) -> BackendResult<()> {
        let builder = self.request(Method::POST, "/auth/logout", token);
        self.send(builder, Auth::Credentials, "Failed to logout.")
            .await?;
        Ok(())
    }

    async fn profile(&self, token: Option<&str>) -> BackendResult<UserProfile> {
        self.fetch("/users/profile", token, "Failed to fetch user profile.")
            .await
    }

    async fn list_posts(&self, token: Option<&str>) -> BackendResult<Vec<Post>> {
        self.fetch("/posts", token, "Failed to fetch all posts.").await
    }

    async fn my_posts(&self, token: Option<&str>) -> BackendResult<Vec<Post>> {
        self.fetch("/posts/my", token, "Failed to fetch posts.").await
    }

    async fn get_post(&self, token: Option<&str>, id: i64) -> BackendResult<Post> {
        self.fetch(&format!("/posts/{id}"), token, "Failed to fetch post.")
            .await
    }

    async fn create_post(&self, token: Option<&str>, payload: PostPayload) -> BackendResult<Post> {
        self.submit(Method::POST, "/posts", token, &payload, "Failed to create post.")
            .await
    }

    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        payload: PostPayload,
    ) -> BackendResult<Post> {
        self.submit(
            Method::PATCH,
            &format!("/posts/{id}"),
            token,
            &payload,
            "Failed to update post.",
        )
        .await
    }

    async fn delete_post(&self, token: Option<&str>, id: i64) -> BackendResult<()> {
        let builder = self.request(Method::DELETE, &format!("/posts/{id}"), token);
        self.send(builder, Auth::Session, "Failed to delete post.")
            .await?;
        Ok(())
    }
}
