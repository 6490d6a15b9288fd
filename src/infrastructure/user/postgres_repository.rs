//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::debug;

use crate::domain::user::{NewUser, User, UserRepository, UserUpdate};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const USER_COLUMNS: &str =
    "id, username, email, full_name, hashed_password, is_active, created_at, updated_at";

/// PostgreSQL implementation of UserRepository.
///
/// Each query checks a connection out of the pool and hands it back when the
/// future completes or is dropped, error paths included.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
    hasher: Arc<dyn PasswordHasher>,
}

impl std::fmt::Debug for PostgresUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresUserRepository")
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { pool, hasher }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by {}: {}", column, e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn add(&self, new_user: NewUser) -> Result<User, DomainError> {
        let hashed_password = self.hasher.hash(&new_user.password)?;

        let query = format!(
            r#"
            INSERT INTO users (username, email, full_name, hashed_password, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.full_name)
            .bind(&hashed_password)
            .bind(new_user.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "create"))?;

        row_to_user(&row)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("username", username).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email).await
    }

    async fn browse(&self, skip: u32, limit: u32) -> Result<Vec<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users ORDER BY id OFFSET $1 LIMIT $2",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(i64::from(skip))
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn update(&self, user: &User, update: UserUpdate) -> Result<User, DomainError> {
        let password_hash = match &update.password {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };

        let mut updated = user.clone();

        if !updated.apply_update(&update, password_hash) {
            debug!(user_id = user.id(), "No changes to persist");
            return Ok(updated);
        }

        let query = format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, full_name = $4, hashed_password = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(updated.id())
            .bind(updated.username())
            .bind(updated.email())
            .bind(updated.full_name())
            .bind(updated.hashed_password())
            .bind(updated.is_active())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "update"))?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user.id())))?;

        row_to_user(&row)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// Translate a failed INSERT/UPDATE, surfacing unique constraint hits as such
fn map_write_error(error: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            let field = constraint_field(db_error.constraint());
            return DomainError::unique_violation(field, db_error.message().to_string());
        }
    }

    DomainError::storage(format!("Failed to {} user: {}", action, error))
}

/// Map a PostgreSQL constraint name (e.g. `users_email_key`) to its column
fn constraint_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("username") => "username",
        Some(name) if name.contains("email") => "email",
        _ => "unknown",
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let read_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: i64 = row.try_get("id").map_err(read_error)?;
    let username: String = row.try_get("username").map_err(read_error)?;
    let email: String = row.try_get("email").map_err(read_error)?;
    let full_name: Option<String> = row.try_get("full_name").map_err(read_error)?;
    let hashed_password: String = row.try_get("hashed_password").map_err(read_error)?;
    let is_active: bool = row.try_get("is_active").map_err(read_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read_error)?;

    Ok(User::new(id, username, email, hashed_password)
        .with_full_name(full_name)
        .with_active(is_active)
        .with_timestamps(created_at, updated_at))
}
