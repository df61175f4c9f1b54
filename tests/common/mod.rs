#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, Response, header},
};
use chrono::{TimeZone, Utc};
use post_portal::{
    AppConfig, AppState, create_router,
    backend::{BackendError, BackendResult, BackendState, PostsBackend},
    models::{Author, Post, PostPayload, SignInRequest, SignUpRequest, UserProfile},
};
use std::sync::{Arc, Mutex};

/// StubBackend
///
/// In-memory stand-in for the external backend. Every call records the session
/// token it was given; `fail_with` makes every call fail with that error and
/// `fail_delete` fails only deletions.
#[derive(Default)]
pub struct StubBackend {
    pub posts: Vec<Post>,
    pub fail_with: Option<BackendError>,
    pub fail_delete: Option<BackendError>,
    pub sign_in_cookies: Vec<&'static str>,
    pub seen_tokens: Mutex<Vec<Option<String>>>,
    pub created: Mutex<Vec<PostPayload>>,
    pub updated: Mutex<Vec<(i64, PostPayload)>>,
    pub deleted: Mutex<Vec<i64>>,
    pub sign_ups: Mutex<Vec<String>>,
    pub logout_calls: Mutex<usize>,
}

impl StubBackend {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Default::default()
        }
    }

    pub fn failing(error: BackendError) -> Self {
        Self {
            fail_with: Some(error),
            ..Default::default()
        }
    }

    fn record(&self, token: Option<&str>) {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(token.map(str::to_string));
    }

    fn outcome<T>(&self, value: impl FnOnce() -> BackendResult<T>) -> BackendResult<T> {
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => value(),
        }
    }

    fn find(&self, id: i64) -> BackendResult<Post> {
        self.posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or(BackendError::NotFound)
    }
}

#[async_trait]
impl PostsBackend for StubBackend {
    async fn sign_in(&self, _request: SignInRequest) -> BackendResult<Vec<HeaderValue>> {
        self.outcome(|| {
            Ok(self
                .sign_in_cookies
                .iter()
                .copied()
                .map(HeaderValue::from_static)
                .collect())
        })
    }

    async fn sign_up(&self, request: SignUpRequest) -> BackendResult<()> {
        self.outcome(|| {
            self.sign_ups.lock().unwrap().push(request.email);
            Ok(())
        })
    }

    async fn logout(&self, token: Option<&str>) -> BackendResult<()> {
        self.record(token);
        *self.logout_calls.lock().unwrap() += 1;
        self.outcome(|| Ok(()))
    }

    async fn profile(&self, token: Option<&str>) -> BackendResult<UserProfile> {
        self.record(token);
        self.outcome(|| {
            Ok(UserProfile {
                email: "ada@example.com".to_string(),
                name: Some("Ada".to_string()),
            })
        })
    }

    async fn list_posts(&self, token: Option<&str>) -> BackendResult<Vec<Post>> {
        self.record(token);
        self.outcome(|| Ok(self.posts.clone()))
    }

    async fn my_posts(&self, token: Option<&str>) -> BackendResult<Vec<Post>> {
        self.record(token);
        self.outcome(|| Ok(self.posts.clone()))
    }

    async fn get_post(&self, token: Option<&str>, id: i64) -> BackendResult<Post> {
        self.record(token);
        self.outcome(|| self.find(id))
    }

    async fn create_post(&self, token: Option<&str>, payload: PostPayload) -> BackendResult<Post> {
        self.record(token);
        self.outcome(|| {
            self.created.lock().unwrap().push(payload.clone());
            Ok(sample_post(100, &payload.title))
        })
    }

    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        payload: PostPayload,
    ) -> BackendResult<Post> {
        self.record(token);
        self.outcome(|| {
            self.updated.lock().unwrap().push((id, payload.clone()));
            Ok(sample_post(id, &payload.title))
        })
    }

    async fn delete_post(&self, token: Option<&str>, id: i64) -> BackendResult<()> {
        self.record(token);
        if let Some(error) = &self.fail_delete {
            return Err(error.clone());
        }
        self.outcome(|| {
            self.deleted.lock().unwrap().push(id);
            Ok(())
        })
    }
}

pub fn sample_post(id: i64, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        description: format!("About {title}"),
        author_id: 1,
        author: Author {
            id: 1,
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
        },
        created_at: Utc.with_ymd_and_hms(2025, 5, 4, 10, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 5, 6, 8, 0, 0).unwrap(),
    }
}

pub fn app(backend: Arc<StubBackend>) -> Router {
    app_with_config(backend, AppConfig::default())
}

pub fn app_with_config(backend: Arc<StubBackend>, config: AppConfig) -> Router {
    create_router(AppState::new(config, backend as BackendState))
}

pub const TOKEN_COOKIE: &str = "accessToken=abc123";

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
