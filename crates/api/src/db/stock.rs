//! Stock repository.
//!
//! One row per `(product, warehouse)` pair. Referential and uniqueness rules
//! are enforced by the database and surfaced as `InvalidReference` and
//! `Conflict`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{ProductId, StockId, WarehouseId};

use super::RepositoryError;
use crate::models::{CreateStockInput, Pagination, Stock};

const STOCK_COLUMNS: &str = "id, product_id, warehouse_id, quantity, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: StockId,
    product_id: ProductId,
    warehouse_id: WarehouseId,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StockRow> for Stock {
    fn from(row: StockRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            warehouse_id: row.warehouse_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for stock database operations.
pub struct StockRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockRepository<'a> {
    /// Create a new stock repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a stock row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the product or warehouse
    /// does not exist.
    /// Returns `RepositoryError::Conflict` if the pair already has a row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateStockInput) -> Result<Stock, RepositoryError> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            r"
            INSERT INTO shop.stock (product_id, warehouse_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING {STOCK_COLUMNS}
            "
        ))
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_write(e, "stock for this product and warehouse")
        })?;

        Ok(row.into())
    }

    /// Insert or overwrite the quantity for a `(product, warehouse)` pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the product or warehouse
    /// does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_level(&self, input: &CreateStockInput) -> Result<Stock, RepositoryError> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            r"
            INSERT INTO shop.stock (product_id, warehouse_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, warehouse_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING {STOCK_COLUMNS}
            "
        ))
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "stock"))?;

        Ok(row.into())
    }

    /// Get a stock row by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StockId) -> Result<Option<Stock>, RepositoryError> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM shop.stock WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all stock rows ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, page: Pagination) -> Result<Vec<Stock>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM shop.stock ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the stock rows held for a product across all warehouses.
    ///
    /// An unknown product yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Stock>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM shop.stock WHERE product_id = $1 ORDER BY warehouse_id"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the stock rows held in a warehouse.
    ///
    /// An unknown warehouse yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_warehouse(
        &self,
        warehouse_id: WarehouseId,
    ) -> Result<Vec<Stock>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {STOCK_COLUMNS} FROM shop.stock WHERE warehouse_id = $1 ORDER BY product_id"
        ))
        .bind(warehouse_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Set the quantity of a stock row. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_quantity(
        &self,
        id: StockId,
        quantity: i32,
    ) -> Result<Option<Stock>, RepositoryError> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            "UPDATE shop.stock SET quantity = $2 WHERE id = $1 RETURNING {STOCK_COLUMNS}"
        ))
        .bind(id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a stock row. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: StockId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.stock WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
