//! Path and query extractors that reject with the API error shape

use axum::{
    extract::{FromRequestParts, Path as AxumPath, Query as AxumQuery},
    http::{request::Parts, StatusCode},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// `axum::extract::Path` that answers bad segments with 422 `{"detail"}`
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

/// `axum::extract::Query` that answers bad parameters with 422 `{"detail"}`
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        AxumPath::<T>::from_request_parts(parts, state)
            .await
            .map(|AxumPath(value)| Path(value))
            .map_err(|rejection| reject(rejection.status(), rejection.body_text()))
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        AxumQuery::<T>::from_request_parts(parts, state)
            .await
            .map(|AxumQuery(value)| Query(value))
            .map_err(|rejection| reject(rejection.status(), rejection.body_text()))
    }
}

/// Client mistakes become 422; routing faults keep their server status
fn reject(status: StatusCode, detail: String) -> ApiError {
    if status.is_server_error() {
        ApiError::new(status, detail)
    } else {
        ApiError::unprocessable(detail)
    }
}
