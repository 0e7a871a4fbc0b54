//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};
use std::collections::HashMap;

use crate::domain::user::{NewUser, Post, User, UserChanges, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, email, name, created_at";
const POST_COLUMNS: &str = "id, title, content, published, author_id, created_at";

/// PostgreSQL implementation of UserRepository
///
/// Posts live in their own table and are attached to every returned user.
/// Deleting a user removes its posts through the `ON DELETE CASCADE` foreign key.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn posts_for<'e, E>(executor: E, author_id: UserId) -> Result<Vec<Post>, DomainError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE author_id = $1 ORDER BY id",
            POST_COLUMNS
        ))
        .bind(author_id.value())
        .fetch_all(executor)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load posts: {}", e)))?;

        Ok(rows.iter().map(row_to_post).collect())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, name) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new_user.email)
        .bind(&new_user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create user: {}", e)))?;

        row_to_user(&row, Vec::new())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let post_rows = sqlx::query(&format!(
            "SELECT {} FROM posts ORDER BY author_id, id",
            POST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load posts: {}", e)))?;

        let mut posts_by_author: HashMap<i64, Vec<Post>> = HashMap::new();
        for post in post_rows.iter().map(row_to_post) {
            posts_by_author.entry(post.author_id).or_default().push(post);
        }

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            let id: i64 = row.get("id");
            let posts = posts_by_author.remove(&id).unwrap_or_default();
            users.push(row_to_user(&row, posts)?);
        }

        Ok(users)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => {
                let posts = Self::posts_for(&self.pool, id).await?;
                Ok(Some(row_to_user(&row, posts)?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, DomainError> {
        let (set_name, name) = match changes.name {
            Some(name) => (true, name),
            None => (false, None),
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = CASE WHEN $3 THEN $4 ELSE name END
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id.value())
        .bind(&changes.email)
        .bind(set_name)
        .bind(&name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        match row {
            Some(row) => {
                let posts = Self::posts_for(&self.pool, id).await?;
                Ok(Some(row_to_user(&row, posts)?))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        // Posts are read before the cascade removes them
        let posts = Self::posts_for(&mut *tx, id).await?;

        let row = sqlx::query(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit delete: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row, posts)?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_user(row: &PgRow, posts: Vec<Post>) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let email: String = row.get("email");
    let name: Option<String> = row.get("name");
    let created_at: DateTime<Utc> = row.get("created_at");

    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(user_id, email, name, created_at, posts))
}

fn row_to_post(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        published: row.get("published"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
    }
}
