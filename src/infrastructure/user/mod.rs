//! User infrastructure module
//!
//! This module provides implementations for user persistence and management,
//! including password hashing with Argon2, PostgreSQL and in-memory repositories,
//! and the user service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
#[cfg(test)]
pub use password::MockPasswordHasher;
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::UserService;
