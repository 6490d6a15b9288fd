//! Registration, login and user management endpoints

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserUpdate,
    UserValidationError,
};

const USER_NOT_FOUND: &str = "User not found";
const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Request body for POST /register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
}

/// Request body for POST /login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
}

/// Request body for PATCH /users/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// Pagination for GET /users
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// Public user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            full_name: user.full_name().map(String::from),
            is_active: user.is_active(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

impl From<UserValidationError> for ApiError {
    fn from(err: UserValidationError) -> Self {
        ApiError::unprocessable(err.to_string())
    }
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(username = %request.username, "Registration requested");

    validate_username(&request.username)?;
    let email = request.email.unwrap_or_default();
    validate_email(&email)?;
    validate_password(&request.password)?;

    let new_user = NewUser::new(request.username, email, request.password)
        .with_full_name(request.full_name);

    let user = state.user_service.create_user(new_user).await?;
    info!(user_id = user.id(), username = %user.username(), "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?;

    let Some(user) = user else {
        warn!(username = %request.username, "Login rejected");
        return Err(ApiError::invalid_credentials());
    };

    info!(user_id = user.id(), "Login succeeded");
    Ok(Json(LoginResponse {
        message: format!("Login successful for user: {}", user.username()),
    }))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service.get_users(query.skip, query.limit).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(username) = request.username.as_deref() {
        validate_username(username)?;
    }
    if let Some(email) = request.email.as_deref() {
        validate_email(email)?;
    }
    if let Some(password) = request.password.as_deref() {
        validate_password(password)?;
    }

    let update = UserUpdate {
        username: request.username,
        email: request.email,
        full_name: request.full_name,
        password: request.password,
        is_active: request.is_active,
    };

    let user = state
        .user_service
        .update_user(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.user_service.delete_user(id).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT)
}
