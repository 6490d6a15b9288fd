//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserUpdate};
use crate::domain::DomainError;

/// BREAD operations over the users table.
///
/// Implementations hash plaintext passwords themselves and rely on the
/// store's unique constraints for username and email: a duplicate is
/// reported as [`DomainError::UniqueViolation`], never pre-checked here.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Hash the password and insert a new row
    async fn add(&self, user: NewUser) -> Result<User, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Page through users ordered by id
    async fn browse(&self, skip: u32, limit: u32) -> Result<Vec<User>, DomainError>;

    /// Apply a partial update to an already loaded user.
    ///
    /// Persists at most once, and only if some field actually changed.
    async fn update(&self, user: &User, update: UserUpdate) -> Result<User, DomainError>;

    /// Hard delete; `false` if no row had this id
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
