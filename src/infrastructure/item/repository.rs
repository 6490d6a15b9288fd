//! In-memory item repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::item::{Item, ItemRepository, NewItem};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct ItemList {
    items: Vec<Item>,
    /// Highest id ever handed out; ids are never reused
    last_id: i64,
}

impl ItemList {
    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

/// Process-lifetime item store backed by an ordered list.
///
/// Lookups are linear scans. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemRepository {
    state: Arc<RwLock<ItemList>>,
}

impl InMemoryItemRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial items, keeping their ids and order
    pub fn with_items(items: Vec<Item>) -> Self {
        let last_id = items.iter().map(|item| item.id).max().unwrap_or(0);

        Self {
            state: Arc::new(RwLock::new(ItemList { items, last_id })),
        }
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn list(&self) -> Result<Vec<Item>, DomainError> {
        let state = self.state.read().await;
        Ok(state.items.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, DomainError> {
        let state = self.state.read().await;
        Ok(state.items.iter().find(|item| item.id == id).cloned())
    }

    async fn create(&self, item: NewItem) -> Result<Item, DomainError> {
        let mut state = self.state.write().await;

        state.last_id += 1;
        let item = Item::from_new(state.last_id, item);
        state.items.push(item.clone());

        Ok(item)
    }

    async fn replace(&self, id: i64, item: NewItem) -> Result<Option<Item>, DomainError> {
        let mut state = self.state.write().await;

        let Some(index) = state.position(id) else {
            return Ok(None);
        };

        let item = Item::from_new(id, item);
        state.items[index] = item.clone();

        Ok(Some(item))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        match state.position(id) {
            Some(index) => {
                state.items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryItemRepository {
        InMemoryItemRepository::with_items(vec![
            Item::new(1, "Laptop", Some("High-performance laptop".to_string())),
            Item::new(2, "Mouse", None),
            Item::new(3, "Keyboard", None),
        ])
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let repo = seeded();

        let item = repo
            .create(NewItem::new("Monitor", Some("4K".to_string())))
            .await
            .unwrap();

        assert_eq!(item.id, 4);
        assert_eq!(repo.get(4).await.unwrap(), Some(item));
        assert_eq!(repo.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_on_empty_store_starts_at_one() {
        let repo = InMemoryItemRepository::new();

        let first = repo.create(NewItem::new("Cable", None)).await.unwrap();
        assert_eq!(first.id, 1);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_deleting_max() {
        let repo = seeded();

        let monitor = repo.create(NewItem::new("Monitor", None)).await.unwrap();
        assert!(repo.delete(monitor.id).await.unwrap());

        let next = repo.create(NewItem::new("Webcam", None)).await.unwrap();
        assert_eq!(next.id, 5);
    }

    #[tokio::test]
    async fn test_replace_keeps_id_and_position() {
        let repo = seeded();

        let replaced = repo
            .replace(2, NewItem::new("Trackball", Some("Ergonomic".to_string())))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced, Item::new(2, "Trackball", Some("Ergonomic".to_string())));

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["Laptop", "Trackball", "Keyboard"]);
    }

    #[tokio::test]
    async fn test_replace_missing() {
        let repo = seeded();

        let result = repo.replace(99, NewItem::new("Ghost", None)).await.unwrap();
        assert!(result.is_none());
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = seeded();

        assert!(repo.delete(2).await.unwrap());
        assert!(repo.get(2).await.unwrap().is_none());
        assert!(!repo.delete(2).await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let repo = InMemoryItemRepository::new();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(NewItem::new(format!("item-{}", i), None))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=16).collect::<Vec<i64>>());
    }
}
