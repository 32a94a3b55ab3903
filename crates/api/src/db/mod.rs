//! Database operations for the Bazaar `PostgreSQL` database.
//!
//! ## Tables (schema `shop`)
//!
//! - `user` - Accounts (name, unique email, profile picture)
//! - `customer` - Users with a balance and a JSONB cart
//! - `credit_card` - Cards belonging to customers (last four digits only)
//! - `address` - Polymorphic addresses owned by customers or warehouses
//! - `product` - Catalog
//! - `warehouse` - Stock locations
//! - `stock` - Quantity per (product, warehouse)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```
//!
//! Queries are bound at runtime (`sqlx::query_as::<_, Row>`) so the crate
//! builds without a live database or an offline query cache.

pub mod addresses;
pub mod credit_cards;
pub mod customers;
pub mod products;
pub mod stock;
pub mod users;
pub mod warehouses;

use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use credit_cards::CreditCardRepository;
pub use customers::CustomerRepository;
pub use products::ProductRepository;
pub use stock::StockRepository;
pub use users::UserRepository;
pub use warehouses::WarehouseRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl RepositoryError {
    /// Classify an error from an INSERT or UPDATE.
    ///
    /// Unique violations become `Conflict` (with `what` naming the entity),
    /// foreign key violations become `InvalidReference`, everything else
    /// stays a `Database` error.
    pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(format!("{what} already exists"));
            }
            if db_err.is_foreign_key_violation() {
                return Self::InvalidReference(describe_foreign_key(db_err.constraint()));
            }
        }
        Self::Database(err)
    }
}

/// Human-readable message for a named foreign key constraint.
fn describe_foreign_key(constraint: Option<&str>) -> String {
    match constraint {
        Some("stock_product_id_fkey") => "product does not exist".to_owned(),
        Some("stock_warehouse_id_fkey") => "warehouse does not exist".to_owned(),
        Some("credit_card_customer_id_fkey") => "customer does not exist".to_owned(),
        Some("customer_user_id_fkey") => "user does not exist".to_owned(),
        Some(other) => format!("referenced row does not exist ({other})"),
        None => "referenced row does not exist".to_owned(),
    }
}

/// Scale of every `NUMERIC(12, 2)` amount column.
pub const AMOUNT_SCALE: u32 = 2;

/// Normalise an amount read from a `NUMERIC(12, 2)` column.
///
/// Postgres returns zero with scale 0, so amounts are rescaled to always
/// serialise with two decimal places.
pub(crate) fn amount(mut value: Decimal) -> Decimal {
    value.rescale(AMOUNT_SCALE);
    value
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_foreign_key() {
        assert_eq!(
            describe_foreign_key(Some("stock_product_id_fkey")),
            "product does not exist"
        );
        assert_eq!(
            describe_foreign_key(Some("stock_warehouse_id_fkey")),
            "warehouse does not exist"
        );
        assert_eq!(
            describe_foreign_key(Some("other_fkey")),
            "referenced row does not exist (other_fkey)"
        );
        assert_eq!(describe_foreign_key(None), "referenced row does not exist");
    }

    #[test]
    fn test_amount_has_two_decimal_places() {
        assert_eq!(amount(Decimal::ZERO).to_string(), "0.00");
        assert_eq!(amount(Decimal::new(5, 0)).to_string(), "5.00");
        assert_eq!(amount(Decimal::new(1250, 2)).to_string(), "12.50");
    }

    #[test]
    fn test_from_write_passes_through_non_database_errors() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound, "stock");
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }
}
