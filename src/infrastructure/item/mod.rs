//! Item infrastructure module

mod repository;

pub use repository::InMemoryItemRepository;
