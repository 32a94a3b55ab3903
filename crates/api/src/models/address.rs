//! Address domain types.
//!
//! Addresses are polymorphic: the owner is identified by
//! `(addressable_type, addressable_id)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{AddressId, AddressableType};

use super::{ValidationError, optional_text, require_text};

/// Longest accepted postal code.
pub const MAX_POSTAL_CODE_LENGTH: usize = 16;

/// A stored address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub id: AddressId,
    /// ID of the owning customer or warehouse.
    pub addressable_id: i32,
    /// Kind of owner.
    pub addressable_type: AddressableType,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    /// State, province or county.
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2, uppercase.
    pub country_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an address.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddressInput {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    pub postal_code: String,
    pub country_code: String,
}

impl AddressInput {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("line1", &self.line1)?;
        optional_text("line2", self.line2.as_deref())?;
        require_text("city", &self.city)?;
        optional_text("region", self.region.as_deref())?;
        validate_postal_code(&self.postal_code)?;
        validate_country_code(&self.country_code)
    }
}

/// Request body for a partial address update. The owner cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAddressInput {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

impl UpdateAddressInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        optional_text("line1", self.line1.as_deref())?;
        optional_text("line2", self.line2.as_deref())?;
        optional_text("city", self.city.as_deref())?;
        optional_text("region", self.region.as_deref())?;
        if let Some(postal_code) = &self.postal_code {
            validate_postal_code(postal_code)?;
        }
        if let Some(country_code) = &self.country_code {
            validate_country_code(country_code)?;
        }
        Ok(())
    }
}

fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("postal_code", "cannot be blank"));
    }
    if value.len() > MAX_POSTAL_CODE_LENGTH {
        return Err(ValidationError::new(
            "postal_code",
            format!("must be at most {MAX_POSTAL_CODE_LENGTH} characters"),
        ));
    }
    Ok(())
}

fn validate_country_code(value: &str) -> Result<(), ValidationError> {
    if value.len() == 2 && value.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "country_code",
            "must be a two-letter ISO 3166-1 code",
        ))
    }
}
