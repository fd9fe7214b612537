//! Domain models and request validation for the user service

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered user. Identifiers are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Incoming create payload.
///
/// The name is kept loose (`Value`) so that type mismatches surface as 400s
/// with a descriptive message instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: Option<Value>,
}

/// A validated create request, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
}

/// Validation error for create payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The name field is absent from the payload
    MissingName,

    /// Name present but empty after trimming
    EmptyName,

    /// Name is not a JSON string
    InvalidName,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Name is required"),
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::InvalidName => write!(f, "Name must be a string"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CreateUserRequest {
    /// Validate the payload into a [`NewUser`].
    ///
    /// The name must be present and a non-empty string; surrounding
    /// whitespace is trimmed before insert.
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let name = match &self.name {
            Some(Value::String(s)) => s.trim(),
            Some(_) => return Err(ValidationError::InvalidName),
            None => return Err(ValidationError::MissingName),
        };

        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(NewUser {
            name: name.to_owned(),
        })
    }
}

/// Response body for `GET /` - service name, status, and backing store.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub database: String,
}
