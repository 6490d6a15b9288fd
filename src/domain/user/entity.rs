//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for creating a user; `password` is plaintext and is hashed by the repository
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl NewUser {
    /// Create an active user request without a full name
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            full_name: None,
            is_active: true,
        }
    }

    pub fn with_full_name(mut self, full_name: Option<String>) -> Self {
        self.full_name = full_name;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Partial change set for a user. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// User entity as stored in the users table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: i64,
    username: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    /// Password digest - never exposed in serialization
    #[serde(skip_serializing, default)]
    hashed_password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create an active user with fresh timestamps
    pub fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: username.into(),
            email: email.into(),
            full_name: None,
            hashed_password: hashed_password.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_full_name(mut self, full_name: Option<String>) -> Self {
        self.full_name = full_name;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Restore store-assigned timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // Getters

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply the present fields of `update`, replacing only values that differ.
    ///
    /// `password_hash` is the digest of `update.password`, computed by the caller.
    /// Returns whether anything changed; `updated_at` is touched only then.
    pub fn apply_update(&mut self, update: &UserUpdate, password_hash: Option<String>) -> bool {
        let mut changed = false;

        if let Some(hash) = password_hash {
            if hash != self.hashed_password {
                self.hashed_password = hash;
                changed = true;
            }
        }

        changed |= replace_if_changed(&mut self.username, update.username.as_ref());
        changed |= replace_if_changed(&mut self.email, update.email.as_ref());

        if let Some(full_name) = &update.full_name {
            if self.full_name.as_ref() != Some(full_name) {
                self.full_name = Some(full_name.clone());
                changed = true;
            }
        }

        if let Some(is_active) = update.is_active {
            if self.is_active != is_active {
                self.is_active = is_active;
                changed = true;
            }
        }

        if changed {
            self.touch();
        }

        changed
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn replace_if_changed(current: &mut String, new: Option<&String>) -> bool {
    match new {
        Some(value) if value != current => {
            *current = value.clone();
            true
        }
        _ => false,
    }
}
