//! User domain
//!
//! This module provides domain types and traits for persisted users,
//! including the user entity, request shape validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserUpdate};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_password, validate_username, UserValidationError};
