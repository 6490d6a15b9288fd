//! Item domain - the volatile item catalogue

mod entity;
mod repository;

pub use entity::{Item, NewItem};
pub use repository::ItemRepository;
