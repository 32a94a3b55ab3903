//! Domain models for the Bazaar API.
//!
//! These types represent validated domain objects separate from database row
//! types. Each entity has a read model (serialized in responses) and input
//! types (deserialized from request bodies) that validate themselves before
//! any database work happens.

pub mod address;
pub mod credit_card;
pub mod customer;
pub mod product;
pub mod stock;
pub mod user;
pub mod warehouse;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

pub use address::{Address, AddressInput, UpdateAddressInput};
pub use credit_card::{CreateCreditCardInput, CreditCard};
pub use customer::{CartItem, CreateCustomerInput, Customer, UpdateCustomerInput};
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use stock::{CreateStockInput, Stock, UpdateStockInput};
pub use user::{CreateUserInput, UpdateUserInput, User};
pub use warehouse::{Warehouse, WarehouseInput};

/// Maximum length of short free-text fields (names, address lines).
pub const MAX_TEXT_LENGTH: usize = 255;

/// Largest amount a `NUMERIC(12, 2)` column can hold.
///
/// Mantissa `999_999_999_999` (`0xE8_D4A5_0FFF`) at scale 2.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// A request input that broke a field rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field, as it appears in the request body.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a required short text field: non-blank and at most `MAX_TEXT_LENGTH` characters.
///
/// # Errors
///
/// Returns a `ValidationError` naming `field` if the value is blank or too long.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "cannot be blank"));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_TEXT_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Like [`require_text`], but `None` is accepted.
///
/// # Errors
///
/// Returns a `ValidationError` if the value is present and invalid.
pub fn optional_text(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| require_text(field, v))
}

/// Check a monetary amount: non-negative and within column precision.
///
/// # Errors
///
/// Returns a `ValidationError` if the amount is negative or too large.
pub fn require_amount(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// `limit` / `offset` query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Page size when none is requested.
    pub const DEFAULT_LIMIT: i64 = 100;
    /// Largest page size a client may request.
    pub const MAX_LIMIT: i64 = 500;

    /// Effective page size, clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    /// Effective offset, never negative.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
