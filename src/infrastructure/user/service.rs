//! User service - business rules on top of the user repository

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::user::{NewUser, User, UserRepository, UserUpdate};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// User service for registration, authentication, and management.
///
/// Holds no state of its own; every call goes to the repository. Uniqueness
/// pre-checks give an early, precise error but do not close the race window
/// between check and write: the store's unique constraint stays the final
/// authority and surfaces as [`DomainError::UniqueViolation`].
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<R: UserRepository> std::fmt::Debug for UserService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user.
    ///
    /// Order: username check, email check, then hash and persist, so a
    /// rejected request never pays for hashing.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        self.ensure_username_free(&new_user.username, None).await?;
        self.ensure_email_free(&new_user.email, None).await?;

        info!(username = %new_user.username, "Attempting to create user");

        let user = self.repository.add(new_user).await?;

        info!(user_id = user.id(), "Successfully created user");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        debug!(user_id = id, "Fetching user by ID");
        self.repository.get_by_id(id).await
    }

    /// List users, ordered by id
    pub async fn get_users(&self, skip: u32, limit: u32) -> Result<Vec<User>, DomainError> {
        debug!(skip, limit, "Browsing users");
        self.repository.browse(skip, limit).await
    }

    /// Apply a partial update; `None` if no user has this id
    pub async fn update_user(
        &self,
        id: i64,
        update: UserUpdate,
    ) -> Result<Option<User>, DomainError> {
        info!(
            user_id = id,
            username = ?update.username,
            email = ?update.email,
            password_changed = update.password.is_some(),
            "Attempting to update user"
        );

        let Some(existing) = self.repository.get_by_id(id).await? else {
            warn!(user_id = id, "Update failed: user not found");
            return Ok(None);
        };

        if let Some(username) = update.username.as_deref() {
            if username != existing.username() {
                self.ensure_username_free(username, Some(id)).await?;
            }
        }

        if let Some(email) = update.email.as_deref() {
            if email != existing.email() {
                self.ensure_email_free(email, Some(id)).await?;
            }
        }

        let updated = self.repository.update(&existing, update).await?;

        info!(user_id = id, "Successfully updated user");
        Ok(Some(updated))
    }

    /// Delete a user; `false` if no user has this id
    pub async fn delete_user(&self, id: i64) -> Result<bool, DomainError> {
        info!(user_id = id, "Attempting to delete user");

        if self.repository.get_by_id(id).await?.is_none() {
            warn!(user_id = id, "Delete failed: user not found");
            return Ok(false);
        }

        let deleted = self.repository.delete(id).await?;

        if deleted {
            info!(user_id = id, "Successfully deleted user");
        } else {
            error!(user_id = id, "Deletion failed unexpectedly after initial check");
        }

        Ok(deleted)
    }

    /// Check credentials.
    ///
    /// Returns `None` for an unknown username or a wrong password alike, so
    /// callers cannot tell the cases apart. `is_active` plays no part.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.repository.get_by_username(username).await? else {
            return Ok(None);
        };

        if !self.hasher.verify(password, user.hashed_password()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        owner: Option<i64>,
    ) -> Result<(), DomainError> {
        match self.repository.get_by_username(username).await? {
            Some(existing) if Some(existing.id()) != owner => Err(DomainError::conflict(
                format!("Username '{}' is already taken.", username),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> Result<(), DomainError> {
        match self.repository.get_by_email(email).await? {
            Some(existing) if Some(existing.id()) != owner => Err(DomainError::conflict(
                format!("Email '{}' is already registered.", email),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::{Argon2Hasher, MockPasswordHasher};
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository> {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
        let repository = Arc::new(InMemoryUserRepository::new(hasher.clone()));
        UserService::new(repository, hasher)
    }

    fn make_user(username: &str, email: &str) -> NewUser {
        NewUser::new(username, email, "Secure123")
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service
            .create_user(make_user("testuser", "test@example.com").with_full_name(Some("Test User".to_string())))
            .await
            .unwrap();

        assert_eq!(user.username(), "testuser");
        assert_eq!(user.email(), "test@example.com");
        assert_eq!(user.full_name(), Some("Test User"));
        assert!(user.is_active());
        assert_ne!(user.hashed_password(), "Secure123");
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let service = create_service();
        service
            .create_user(make_user("testuser", "one@example.com"))
            .await
            .unwrap();

        let err = service
            .create_user(make_user("testuser", "two@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert!(err.to_string().contains("Username 'testuser' is already taken."));
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let service = create_service();
        service
            .create_user(make_user("first", "shared@example.com"))
            .await
            .unwrap();

        let err = service
            .create_user(make_user("second", "shared@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert!(err.to_string().contains("Email 'shared@example.com' is already registered."));
    }

    #[tokio::test]
    async fn test_rejected_create_never_hashes() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let hasher: Arc<dyn PasswordHasher> = Arc::new(hasher);
        let existing = User::new(1, "taken", "taken@example.com", "digest");
        let repository = Arc::new(InMemoryUserRepository::with_users(hasher.clone(), vec![existing]));
        let service = UserService::new(repository, hasher);

        let by_username = service
            .create_user(make_user("taken", "fresh@example.com"))
            .await;
        let by_email = service
            .create_user(make_user("fresh", "taken@example.com"))
            .await;

        assert!(matches!(by_username, Err(DomainError::Conflict { .. })));
        assert!(matches!(by_email, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_get_user_and_get_users() {
        let service = create_service();
        let alice = service.create_user(make_user("alice", "alice@example.com")).await.unwrap();
        service.create_user(make_user("bob", "bob@example.com")).await.unwrap();

        let fetched = service.get_user(alice.id()).await.unwrap().unwrap();
        assert_eq!(fetched.username(), "alice");
        assert!(service.get_user(404).await.unwrap().is_none());

        let users = service.get_users(0, 100).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username(), "alice");
        assert_eq!(service.get_users(1, 1).await.unwrap()[0].username(), "bob");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = create_service();

        let result = service
            .update_user(
                42,
                UserUpdate {
                    full_name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_password_only() {
        let service = create_service();
        let user = service
            .create_user(make_user("alice", "alice@example.com").with_full_name(Some("Alice".to_string())))
            .await
            .unwrap();

        let updated = service
            .update_user(
                user.id(),
                UserUpdate {
                    password: Some("Changed456".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.username(), "alice");
        assert_eq!(updated.email(), "alice@example.com");
        assert_eq!(updated.full_name(), Some("Alice"));
        assert_ne!(updated.hashed_password(), user.hashed_password());

        assert!(service.authenticate("alice", "Changed456").await.unwrap().is_some());
        assert!(service.authenticate("alice", "Secure123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_email_only_keeps_hash() {
        let service = create_service();
        let user = service.create_user(make_user("alice", "alice@example.com")).await.unwrap();

        let updated = service
            .update_user(
                user.id(),
                UserUpdate {
                    email: Some("alice@new.example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.email(), "alice@new.example.com");
        assert_eq!(updated.hashed_password(), user.hashed_password());
    }

    #[tokio::test]
    async fn test_update_to_taken_username_or_email() {
        let service = create_service();
        service.create_user(make_user("alice", "alice@example.com")).await.unwrap();
        let bob = service.create_user(make_user("bob", "bob@example.com")).await.unwrap();

        let err = service
            .update_user(
                bob.id(),
                UserUpdate {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        let err = service
            .update_user(
                bob.id(),
                UserUpdate {
                    email: Some("alice@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_keeping_own_username_is_allowed() {
        let service = create_service();
        let user = service.create_user(make_user("alice", "alice@example.com")).await.unwrap();

        let updated = service
            .update_user(
                user.id(),
                UserUpdate {
                    username: Some("alice".to_string()),
                    full_name: Some("Alice A.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.full_name(), Some("Alice A."));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = create_service();
        let user = service.create_user(make_user("alice", "alice@example.com")).await.unwrap();

        assert!(service.delete_user(user.id()).await.unwrap());
        assert!(service.get_user(user.id()).await.unwrap().is_none());
        assert!(!service.delete_user(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = create_service();
        service.create_user(make_user("alice", "alice@example.com")).await.unwrap();

        let user = service.authenticate("alice", "Secure123").await.unwrap();
        assert_eq!(user.unwrap().username(), "alice");

        assert!(service.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(service.authenticate("nobody", "Secure123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_ignores_active_flag() {
        let service = create_service();
        service
            .create_user(make_user("alice", "alice@example.com").with_active(false))
            .await
            .unwrap();

        let user = service.authenticate("alice", "Secure123").await.unwrap();
        assert!(!user.unwrap().is_active());
    }

    #[tokio::test]
    async fn test_count() {
        let service = create_service();
        assert_eq!(service.count().await.unwrap(), 0);

        service.create_user(make_user("alice", "alice@example.com")).await.unwrap();
        assert_eq!(service.count().await.unwrap(), 1);
    }
}
