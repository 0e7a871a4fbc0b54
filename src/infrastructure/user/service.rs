//! User service for request-level user management
//!
//! Raw path ids and JSON payloads come in, validated store calls go out.
//! Id parsing and payload validation always happen before the store is touched.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::user::{
    validate_create_payload, validate_update_payload, User, UserId, UserRepository,
};
use crate::domain::DomainError;

/// User service
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a user from a JSON payload
    pub async fn create(&self, payload: &Value) -> Result<User, DomainError> {
        let new_user = validate_create_payload(payload)?;

        let user = self.repository.create(new_user).await?;
        info!(user_id = %user.id(), "Created user");

        Ok(user)
    }

    /// List all users with their posts
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.repository.list().await?;
        debug!(count = users.len(), "Listed users");

        Ok(users)
    }

    /// Get a user by its raw path id
    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::parse(id)?;

        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))
    }

    /// Apply a partial update
    pub async fn update(&self, id: &str, payload: &Value) -> Result<User, DomainError> {
        let user_id = UserId::parse(id)?;
        let changes = validate_update_payload(payload)?;

        if changes.is_empty() {
            debug!(user_id = %user_id, "Empty update, returning current user");
        }

        let user = self
            .repository
            .update(user_id, changes)
            .await?
            .ok_or_else(|| not_found(user_id))?;
        info!(user_id = %user_id, "Updated user");

        Ok(user)
    }

    /// Delete a user and its posts, returning the deleted record
    pub async fn delete(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::parse(id)?;

        let user = self
            .repository
            .delete(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))?;
        info!(user_id = %user_id, posts = user.posts().len(), "Deleted user");

        Ok(user)
    }

    /// Number of stored users; doubles as a store reachability probe
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn not_found(id: UserId) -> DomainError {
    DomainError::not_found(format!("User '{}' not found", id))
}
