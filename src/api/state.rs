//! Application state for shared services

use std::sync::Arc;

use crate::domain::item::ItemRepository;
use crate::domain::user::{NewUser, User, UserRepository, UserUpdate};
use crate::domain::DomainError;
use crate::infrastructure::user::UserService;

/// Application state injected into every handler.
///
/// The item store lives as long as the process; user calls reach the
/// database through the service's pooled repository.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub item_repository: Arc<dyn ItemRepository>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        item_repository: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            user_service,
            item_repository,
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, DomainError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn get_users(&self, skip: u32, limit: u32) -> Result<Vec<User>, DomainError>;
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, DomainError>;
    async fn delete_user(&self, id: i64) -> Result<bool, DomainError>;
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn create_user(&self, user: NewUser) -> Result<User, DomainError> {
        UserService::create_user(self, user).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        UserService::get_user(self, id).await
    }

    async fn get_users(&self, skip: u32, limit: u32) -> Result<Vec<User>, DomainError> {
        UserService::get_users(self, skip, limit).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, DomainError> {
        UserService::update_user(self, id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DomainError> {
        UserService::delete_user(self, id).await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, username, password).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}
