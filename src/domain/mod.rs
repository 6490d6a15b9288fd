//! Domain layer - entities, validation rules, and repository traits

pub mod error;
pub mod item;
pub mod user;

pub use error::DomainError;
pub use item::{Item, ItemRepository, NewItem};
pub use user::{NewUser, User, UserRepository, UserUpdate};
