//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserChanges, UserId};
use crate::domain::DomainError;

/// Entity store for users and their posts
///
/// Every returned `User` carries its posts. Implementations assign `id` and
/// `createdAt` on insert.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Insert a new user
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;

    /// List all users in store order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Get a user by ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Apply changes to an existing user; `None` when no row matches
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, DomainError>;

    /// Remove a user; returns the deleted row, `None` when no row matches
    async fn delete(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Count stored users
    async fn count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::infrastructure::user::InMemoryUserRepository;

    /// Repository wrapper that counts calls and can be told to fail
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        inner: InMemoryUserRepository,
        calls: AtomicUsize,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockUserRepository {
        /// Create a new mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of store calls made so far
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn record(&self) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
            self.record().await?;
            self.inner.create(new_user).await
        }

        async fn list(&self) -> Result<Vec<User>, DomainError> {
            self.record().await?;
            self.inner.list().await
        }

        async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
            self.record().await?;
            self.inner.get(id).await
        }

        async fn update(
            &self,
            id: UserId,
            changes: UserChanges,
        ) -> Result<Option<User>, DomainError> {
            self.record().await?;
            self.inner.update(id, changes).await
        }

        async fn delete(&self, id: UserId) -> Result<Option<User>, DomainError> {
            self.record().await?;
            self.inner.delete(id).await
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.record().await?;
            self.inner.count().await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_counts_calls() {
            let repo = MockUserRepository::new();

            repo.create(NewUser::new("a@b.com", None)).await.unwrap();
            repo.list().await.unwrap();

            assert_eq!(repo.calls(), 2);
        }

        #[tokio::test]
        async fn test_should_fail() {
            let repo = MockUserRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.list().await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
