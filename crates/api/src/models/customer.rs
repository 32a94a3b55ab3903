//! Customer domain types.
//!
//! A customer is a [`User`] with a store-credit balance and a cart. The cart
//! is persisted as a JSON array on the customer row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::ProductId;

use super::{CreateUserInput, UpdateUserInput, User, ValidationError, require_amount};

/// Largest quantity accepted for a single cart line.
pub const MAX_CART_QUANTITY: i32 = 10_000;

/// A customer (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// The user this customer extends.
    #[serde(flatten)]
    pub user: User,
    /// Store-credit balance.
    pub balance: Decimal,
    /// Cart lines in the order they were added.
    pub cart: Vec<CartItem>,
}

/// One cart line: a product and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

impl CartItem {
    /// Validate the quantity.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` unless `1 <= quantity <= MAX_CART_QUANTITY`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_CART_QUANTITY).contains(&self.quantity) {
            return Err(ValidationError::new(
                "quantity",
                format!("must be between 1 and {MAX_CART_QUANTITY}"),
            ));
        }
        Ok(())
    }
}

/// Request body for creating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerInput {
    #[serde(flatten)]
    pub user: CreateUserInput,
    #[serde(default)]
    pub balance: Decimal,
}

impl CreateCustomerInput {
    /// Validate the user fields and the opening balance.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.user.validate()?;
        require_amount("balance", self.balance)
    }
}

/// Request body for a partial customer update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerInput {
    #[serde(flatten)]
    pub user: UpdateUserInput,
    pub balance: Option<Decimal>,
}

impl UpdateCustomerInput {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.user.validate()?;
        self.balance
            .map_or(Ok(()), |balance| require_amount("balance", balance))
    }
}
