//! Polymorphic address owners.

use serde::{Deserialize, Serialize};

/// The kind of entity an address belongs to.
///
/// Paired with an `addressable_id` this identifies the owner row. There is no
/// foreign key on the pair; owners clean up their own addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.addressable_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AddressableType {
    /// Shipping or billing address of a customer.
    Customer,
    /// Physical location of a warehouse.
    Warehouse,
}

impl AddressableType {
    /// Wire / database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Warehouse => "warehouse",
        }
    }
}

impl core::fmt::Display for AddressableType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&AddressableType::Customer).unwrap(),
            "\"customer\""
        );
        let parsed: AddressableType = serde_json::from_str("\"warehouse\"").unwrap();
        assert_eq!(parsed, AddressableType::Warehouse);
    }
}
