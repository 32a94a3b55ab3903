//! Warehouse repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::WarehouseId;

use super::RepositoryError;
use crate::models::{Pagination, Warehouse, WarehouseInput};

const WAREHOUSE_COLUMNS: &str = "id, name, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct WarehouseRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        Self {
            id: WarehouseId::new(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for warehouse database operations.
pub struct WarehouseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WarehouseRepository<'a> {
    /// Create a new warehouse repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a warehouse.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &WarehouseInput) -> Result<Warehouse, RepositoryError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            "INSERT INTO shop.warehouse (name) VALUES ($1) RETURNING {WAREHOUSE_COLUMNS}"
        ))
        .bind(input.name.trim())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "warehouse with this name"))?;

        Ok(row.into())
    }

    /// Get a warehouse by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: WarehouseId) -> Result<Option<Warehouse>, RepositoryError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM shop.warehouse WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Look a warehouse up by its unique name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Warehouse>, RepositoryError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM shop.warehouse WHERE name = $1"
        ))
        .bind(name.trim())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Check whether a warehouse exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: WarehouseId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shop.warehouse WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// List warehouses ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, page: Pagination) -> Result<Vec<Warehouse>, RepositoryError> {
        let rows = sqlx::query_as::<_, WarehouseRow>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM shop.warehouse ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Rename a warehouse. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: WarehouseId,
        input: &WarehouseInput,
    ) -> Result<Option<Warehouse>, RepositoryError> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            "UPDATE shop.warehouse SET name = $2 WHERE id = $1 RETURNING {WAREHOUSE_COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.trim())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "warehouse with this name"))?;

        Ok(row.map(Into::into))
    }

    /// Delete a warehouse and its addresses. Stock rows cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: WarehouseId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM shop.address
            WHERE addressable_type = 'warehouse' AND addressable_id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM shop.warehouse WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
