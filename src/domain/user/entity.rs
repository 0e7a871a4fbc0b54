//! User entity and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

static NUMERIC_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// User identifier - non-negative integer assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId, rejecting negative values
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id < 0 {
            return Err(DomainError::invalid_id(format!(
                "User ID must be a non-negative integer, got {}",
                id
            )));
        }

        Ok(Self(id))
    }

    /// Parse an identifier taken from a request path
    ///
    /// Only plain decimal digits are accepted, so signs, whitespace and
    /// fractional forms are all rejected before any store lookup.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if !NUMERIC_ID_PATTERN.is_match(raw) {
            return Err(DomainError::invalid_id(format!(
                "Validation failed (numeric string is expected): '{}'",
                raw
            )));
        }

        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("User ID '{}' is out of range", raw)))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post authored by a user. Read-only from this system's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    posts: Vec<Post>,
}

impl User {
    /// Build a freshly stored user; the store supplies id and timestamp
    pub fn new(id: UserId, new_user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new_user.email,
            name: new_user.name,
            created_at,
            posts: Vec::new(),
        }
    }

    /// Rebuild a user from persisted columns
    pub fn restore(
        id: UserId,
        email: impl Into<String>,
        name: Option<String>,
        created_at: DateTime<Utc>,
        posts: Vec<Post>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            name,
            created_at,
            posts,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Name shown in listings
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "No Name",
        }
    }

    // Mutators

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    /// Apply a validated change set; id and creation time are untouched
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(email) = changes.email {
            self.set_email(email);
        }

        if let Some(name) = changes.name {
            self.set_name(name);
        }
    }
}

/// Validated input for creating a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }
}

/// Validated partial update
///
/// `name` is doubly optional: `None` leaves the name alone while
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<Option<String>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}
