use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Item, NewItem};
use crate::domain::DomainError;

/// Repository trait for the item store
#[async_trait]
pub trait ItemRepository: Send + Sync + Debug {
    /// All items in insertion order
    async fn list(&self) -> Result<Vec<Item>, DomainError>;

    async fn get(&self, id: i64) -> Result<Option<Item>, DomainError>;

    /// Append an item under the next id
    async fn create(&self, item: NewItem) -> Result<Item, DomainError>;

    /// Overwrite an existing item in place, keeping its id and position
    async fn replace(&self, id: i64, item: NewItem) -> Result<Option<Item>, DomainError>;

    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
