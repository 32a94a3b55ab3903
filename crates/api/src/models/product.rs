//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::ProductId;

use super::{ValidationError, optional_text, require_amount, require_text};

/// Longest accepted product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
}

impl CreateProductInput {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        validate_description(self.description.as_deref())?;
        require_amount("price", self.price)
    }
}

/// Request body for a partial product update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

impl UpdateProductInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        optional_text("name", self.name.as_deref())?;
        validate_description(self.description.as_deref())?;
        self.price
            .map_or(Ok(()), |price| require_amount("price", price))
    }
}

fn validate_description(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > MAX_DESCRIPTION_LENGTH => Err(ValidationError::new(
            "description",
            format!("must be at most {MAX_DESCRIPTION_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}
