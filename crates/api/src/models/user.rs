//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{Email, UserId};

use super::{ValidationError, require_text};

/// Longest accepted profile picture reference (URL or storage path).
pub const MAX_PROFILE_PICTURE_LENGTH: usize = 2048;

/// A user account.
///
/// Customers embed a `User`; a plain user has no balance or cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: Email,
    /// Profile picture URL or path.
    pub profile_picture: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl CreateUserInput {
    /// Validate field rules not covered by deserialization.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank name or an oversized picture reference.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        validate_profile_picture(self.profile_picture.as_deref())
    }
}

/// Request body for a partial user update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub profile_picture: Option<String>,
}

impl UpdateUserInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank name or an oversized picture reference.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        validate_profile_picture(self.profile_picture.as_deref())
    }
}

fn validate_profile_picture(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ValidationError::new(
            "profile_picture",
            "cannot be blank",
        )),
        Some(v) if v.len() > MAX_PROFILE_PICTURE_LENGTH => Err(ValidationError::new(
            "profile_picture",
            format!("must be at most {MAX_PROFILE_PICTURE_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}
