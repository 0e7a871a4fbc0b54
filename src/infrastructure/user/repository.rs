//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, Post, User, UserChanges, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct Rows {
    users: BTreeMap<UserId, User>,
    /// Next id handed out; ids are never reused, like a serial column
    next_id: i64,
}

impl Default for Rows {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory implementation of UserRepository
///
/// Users are kept ordered by id, which is also the listing order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    rows: Arc<RwLock<Rows>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a post to an existing user
    pub async fn add_post(&self, mut post: Post) -> Result<Post, DomainError> {
        let mut rows = self.rows.write().await;
        let author_id = UserId::new(post.author_id)?;

        let user = rows.users.get_mut(&author_id).ok_or_else(|| {
            DomainError::not_found(format!("User '{}' not found", author_id))
        })?;

        let mut posts = user.posts().to_vec();
        post.id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        posts.push(post.clone());
        user.set_posts(posts);

        Ok(post)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut rows = self.rows.write().await;

        let id = UserId::new(rows.next_id)?;
        rows.next_id += 1;

        let user = User::new(id, new_user, Utc::now());
        rows.users.insert(id, user.clone());

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows.users.values().cloned().collect())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows.users.get(&id).cloned())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, DomainError> {
        let mut rows = self.rows.write().await;

        match rows.users.get_mut(&id) {
            Some(user) => {
                user.apply(changes);
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let mut rows = self.rows.write().await;
        Ok(rows.users.remove(&id))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows.users.len())
    }
}
