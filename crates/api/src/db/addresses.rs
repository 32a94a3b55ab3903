//! Address repository.
//!
//! Addresses are owned polymorphically via `(addressable_type, addressable_id)`.
//! Callers are responsible for checking that the owner exists.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{AddressId, AddressableType};

use super::RepositoryError;
use crate::models::{Address, AddressInput, UpdateAddressInput};

const ADDRESS_COLUMNS: &str = "id, addressable_id, addressable_type, line1, line2, city, \
                               region, postal_code, country_code, created_at, updated_at";

/// Internal row type for address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    addressable_id: i32,
    addressable_type: AddressableType,
    line1: String,
    line2: Option<String>,
    city: String,
    region: Option<String>,
    postal_code: String,
    country_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            addressable_id: row.addressable_id,
            addressable_type: row.addressable_type,
            line1: row.line1,
            line2: row.line2,
            city: row.city,
            region: row.region,
            postal_code: row.postal_code,
            country_code: row.country_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an address for an owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        owner_type: AddressableType,
        owner_id: i32,
        input: &AddressInput,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            INSERT INTO shop.address (
                addressable_id, addressable_type, line1, line2, city,
                region, postal_code, country_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(owner_id)
        .bind(owner_type)
        .bind(input.line1.trim())
        .bind(input.line2.as_deref().map(str::trim))
        .bind(input.city.trim())
        .bind(input.region.as_deref().map(str::trim))
        .bind(input.postal_code.trim())
        .bind(input.country_code.to_ascii_uppercase())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "address"))?;

        Ok(row.into())
    }

    /// Get an address by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM shop.address WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List an owner's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(
        &self,
        owner_type: AddressableType,
        owner_id: i32,
    ) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            SELECT {ADDRESS_COLUMNS}
            FROM shop.address
            WHERE addressable_type = $1 AND addressable_id = $2
            ORDER BY id
            "
        ))
        .bind(owner_type)
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a partial update. Returns `None` if the address does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: AddressId,
        input: &UpdateAddressInput,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r"
            UPDATE shop.address
            SET line1 = COALESCE($2, line1),
                line2 = COALESCE($3, line2),
                city = COALESCE($4, city),
                region = COALESCE($5, region),
                postal_code = COALESCE($6, postal_code),
                country_code = COALESCE($7, country_code)
            WHERE id = $1
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.line1.as_deref().map(str::trim))
        .bind(input.line2.as_deref().map(str::trim))
        .bind(input.city.as_deref().map(str::trim))
        .bind(input.region.as_deref().map(str::trim))
        .bind(input.postal_code.as_deref().map(str::trim))
        .bind(input.country_code.as_deref().map(str::to_ascii_uppercase))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete an address. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.address WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
