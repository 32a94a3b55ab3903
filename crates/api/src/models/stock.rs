//! Stock level domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{ProductId, StockId, WarehouseId};

use super::ValidationError;

/// Quantity of one product held in one warehouse.
///
/// There is at most one stock row per `(product_id, warehouse_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stock {
    pub id: StockId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    /// Units on hand, never negative.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for adding a stock row.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CreateStockInput {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i32,
}

impl CreateStockInput {
    /// # Errors
    ///
    /// Returns a `ValidationError` if the quantity is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quantity(self.quantity)
    }
}

/// Request body for updating a stock row. Only the quantity may change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateStockInput {
    pub quantity: i32,
}

impl UpdateStockInput {
    /// # Errors
    ///
    /// Returns a `ValidationError` if the quantity is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quantity(self.quantity)
    }
}

fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::new("quantity", "cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rules() {
        assert!(UpdateStockInput { quantity: 0 }.validate().is_ok());
        assert!(UpdateStockInput { quantity: 40 }.validate().is_ok());
        assert!(UpdateStockInput { quantity: -1 }.validate().is_err());

        let input = CreateStockInput {
            product_id: ProductId::new(1),
            warehouse_id: WarehouseId::new(2),
            quantity: -10,
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::new("quantity", "cannot be negative"))
        );
    }
}
