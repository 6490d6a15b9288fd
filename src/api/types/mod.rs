//! Shared API request/response plumbing

pub mod error;
pub mod json;
pub mod params;

pub use error::{ApiError, ApiErrorResponse, INVALID_CREDENTIALS};
pub use json::Json;
pub use params::{Path, Query};
