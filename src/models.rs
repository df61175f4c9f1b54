use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Backend Schemas (Wire Format) ---

/// Post
///
/// A post as returned by the backend (`GET /posts`, `GET /posts/{id}`, ...).
/// Field names are camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author
///
/// The embedded author summary of a post. `name` is optional on the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Post {
    /// Display name for cards: the author's name, or the email when no name is set.
    pub fn author_label(&self) -> &str {
        match self.author.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.author.email,
        }
    }

    /// Long en-US date, e.g. "May 4, 2025".
    pub fn created_on(&self) -> String {
        self.created_at.format("%B %-d, %Y").to_string()
    }

    pub fn updated_on(&self) -> String {
        self.updated_at.format("%B %-d, %Y").to_string()
    }
}

/// UserProfile
///
/// Subset of `GET /users/profile` used by the dashboard greeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// ErrorBody
///
/// Error payload of the backend. `message` is either a single string or a list
/// of validation messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<ErrorMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    /// Text shown to the user; lists are joined with ", ".
    pub fn into_text(self) -> String {
        match self {
            ErrorMessage::One(text) => text,
            ErrorMessage::Many(items) => items.join(", "),
        }
    }
}

// --- Request Payloads (Sent to the Backend) ---

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Body of `POST /posts` and `PATCH /posts/{id}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostPayload {
    pub title: String,
    pub description: String,
}

// --- HTML Form Inputs ---

/// SignInForm
///
/// Fields of the sign-in form (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    // Checkbox: "on" when ticked, absent otherwise. Not sent to the backend.
    #[serde(default)]
    pub remember_me: Option<String>,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err("Email and password are required.");
        }
        Ok(())
    }

    pub fn remember_me(&self) -> bool {
        self.remember_me.is_some()
    }

    pub fn to_request(&self) -> SignInRequest {
        SignInRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// SignUpForm
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

pub const MIN_PASSWORD_LEN: usize = 6;

impl SignUpForm {
    /// Checks run before the backend is contacted, in this order.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err("All fields are required.");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters long.");
        }
        Ok(())
    }

    pub fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
        }
    }
}

/// PostForm
///
/// Create and edit forms share the same fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Post title cannot be empty.");
        }
        Ok(())
    }

    pub fn to_payload(&self) -> PostPayload {
        PostPayload {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
        }
    }
}
