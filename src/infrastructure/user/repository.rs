//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserRepository, UserUpdate};
use crate::domain::DomainError;

use super::password::PasswordHasher;

#[derive(Debug, Default)]
struct UserTable {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

impl UserTable {
    /// Mirror of the store's unique constraints, ignoring the row being written
    fn check_unique(&self, user: &User) -> Result<(), DomainError> {
        for other in self.rows.values().filter(|u| u.id() != user.id()) {
            if other.username() == user.username() {
                return Err(DomainError::unique_violation(
                    "username",
                    format!("Username '{}' already exists", user.username()),
                ));
            }

            if other.email() == user.email() {
                return Err(DomainError::unique_violation(
                    "email",
                    format!("Email '{}' already exists", user.email()),
                ));
            }
        }

        Ok(())
    }
}

/// In-memory implementation of UserRepository.
///
/// Rows live in an id-ordered map behind a single lock, so browse order and
/// constraint checks match the PostgreSQL implementation.
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
    hasher: Arc<dyn PasswordHasher>,
}

impl std::fmt::Debug for InMemoryUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUserRepository").finish_non_exhaustive()
    }
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            table: Arc::new(RwLock::new(UserTable::default())),
            hasher,
        }
    }

    /// Create a repository with existing rows; ids continue after the highest one
    pub fn with_users(hasher: Arc<dyn PasswordHasher>, users: Vec<User>) -> Self {
        let mut table = UserTable::default();

        for user in users {
            table.last_id = table.last_id.max(user.id());
            table.rows.insert(user.id(), user);
        }

        Self {
            table: Arc::new(RwLock::new(table)),
            hasher,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add(&self, new_user: NewUser) -> Result<User, DomainError> {
        let hashed_password = self.hasher.hash(&new_user.password)?;

        let mut table = self.table.write().await;
        let user = User::new(
            table.last_id + 1,
            new_user.username,
            new_user.email,
            hashed_password,
        )
        .with_full_name(new_user.full_name)
        .with_active(new_user.is_active);

        table.check_unique(&user)?;
        table.last_id = user.id();
        table.rows.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.username() == username).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email() == email).cloned())
    }

    async fn browse(&self, skip: u32, limit: u32) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User, update: UserUpdate) -> Result<User, DomainError> {
        let password_hash = match &update.password {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };

        let mut updated = user.clone();

        if !updated.apply_update(&update, password_hash) {
            return Ok(updated);
        }

        let mut table = self.table.write().await;

        if !table.rows.contains_key(&updated.id()) {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                updated.id()
            )));
        }

        table.check_unique(&updated)?;
        table.rows.insert(updated.id(), updated.clone());

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::{Argon2Hasher, MockPasswordHasher};

    fn create_repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::new(Argon2Hasher::new()))
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser::new(username, email, "Passw0rdOne")
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_hashes_password() {
        let repo = create_repository();

        let user = repo.add(new_user("alice", "alice@example.com")).await.unwrap();

        assert_eq!(user.id(), 1);
        assert_ne!(user.hashed_password(), "Passw0rdOne");
        assert!(Argon2Hasher::new().verify("Passw0rdOne", user.hashed_password()));
        assert!(user.is_active());

        let second = repo.add(new_user("bob", "bob@example.com")).await.unwrap();
        assert_eq!(second.id(), 2);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_constraint_violation() {
        let repo = create_repository();
        repo.add(new_user("alice", "alice@example.com")).await.unwrap();

        let err = repo
            .add(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UniqueViolation { ref field, .. } if field == "username"));

        let err = repo
            .add(new_user("alicia", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UniqueViolation { ref field, .. } if field == "email"));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = create_repository();
        let user = repo.add(new_user("alice", "alice@example.com")).await.unwrap();

        assert_eq!(repo.get_by_id(user.id()).await.unwrap().unwrap().username(), "alice");
        assert_eq!(repo.get_by_username("alice").await.unwrap().unwrap().id(), user.id());
        assert_eq!(
            repo.get_by_email("alice@example.com").await.unwrap().unwrap().id(),
            user.id()
        );

        assert!(repo.get_by_id(99).await.unwrap().is_none());
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_browse_is_ordered_and_paginated() {
        let repo = create_repository();

        for name in ["carol", "alice", "bob", "dave"] {
            repo.add(new_user(name, &format!("{}@example.com", name)))
                .await
                .unwrap();
        }

        let page = repo.browse(1, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec![2, 3]);

        assert_eq!(repo.browse(0, 100).await.unwrap().len(), 4);
        assert!(repo.browse(10, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_password_only() {
        let repo = create_repository();
        let user = repo
            .add(new_user("alice", "alice@example.com").with_full_name(Some("Alice".to_string())))
            .await
            .unwrap();

        let update = UserUpdate {
            password: Some("N3wPassword".to_string()),
            ..Default::default()
        };
        let updated = repo.update(&user, update).await.unwrap();

        assert_ne!(updated.hashed_password(), user.hashed_password());
        assert_eq!(updated.username(), "alice");
        assert_eq!(updated.email(), "alice@example.com");
        assert_eq!(updated.full_name(), Some("Alice"));

        let stored = repo.get_by_id(user.id()).await.unwrap().unwrap();
        assert!(Argon2Hasher::new().verify("N3wPassword", stored.hashed_password()));
    }

    #[tokio::test]
    async fn test_update_email_keeps_password_hash() {
        let repo = create_repository();
        let user = repo.add(new_user("alice", "alice@example.com")).await.unwrap();

        let update = UserUpdate {
            email: Some("alice@wonderland.test".to_string()),
            ..Default::default()
        };
        let updated = repo.update(&user, update).await.unwrap();

        assert_eq!(updated.email(), "alice@wonderland.test");
        assert_eq!(updated.hashed_password(), user.hashed_password());
        assert_eq!(
            repo.get_by_email("alice@wonderland.test").await.unwrap().unwrap().id(),
            user.id()
        );
    }

    #[tokio::test]
    async fn test_update_without_changes_does_not_persist() {
        let repo = create_repository();
        let user = repo.add(new_user("alice", "alice@example.com")).await.unwrap();

        // Removing the row proves no write happens for an unchanged user
        repo.delete(user.id()).await.unwrap();

        let update = UserUpdate {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        let result = repo.update(&user, update).await.unwrap();

        assert_eq!(result.updated_at(), user.updated_at());
        assert!(repo.get_by_id(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_constraint_violation() {
        let repo = create_repository();
        repo.add(new_user("alice", "alice@example.com")).await.unwrap();
        let bob = repo.add(new_user("bob", "bob@example.com")).await.unwrap();

        let update = UserUpdate {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        let err = repo.update(&bob, update).await.unwrap_err();

        assert!(matches!(err, DomainError::UniqueViolation { .. }));
        assert_eq!(
            repo.get_by_id(bob.id()).await.unwrap().unwrap().email(),
            "bob@example.com"
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = create_repository();
        let user = repo.add(new_user("alice", "alice@example.com")).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(!repo.delete(user.id()).await.unwrap());
        assert!(repo.get_by_id(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_users_continues_ids() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok("digest".to_string()));

        let existing = vec![User::new(7, "zed", "zed@example.com", "digest-zed")];
        let repo = InMemoryUserRepository::with_users(Arc::new(hasher), existing);

        let user = repo.add(new_user("amy", "amy@example.com")).await.unwrap();
        assert_eq!(user.id(), 8);
        assert_eq!(user.hashed_password(), "digest");
    }
}
