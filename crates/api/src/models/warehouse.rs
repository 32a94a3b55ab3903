//! Warehouse domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::WarehouseId;

use super::{ValidationError, require_text};

/// A location that holds stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    /// Unique warehouse name.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or renaming a warehouse.
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseInput {
    pub name: String,
}

impl WarehouseInput {
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank or oversized name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}
