//! Infrastructure layer - concrete stores, hashing, and process plumbing

pub mod item;
pub mod logging;
pub mod storage;
pub mod user;
