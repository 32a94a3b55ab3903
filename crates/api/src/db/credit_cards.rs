//! Credit card repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{CardBrand, CreditCardId, UserId};

use super::RepositoryError;
use crate::models::{CreateCreditCardInput, CreditCard};

const CARD_COLUMNS: &str = "id, customer_id, cardholder_name, brand, last_four, \
                            expiry_month, expiry_year, created_at, updated_at";

/// Internal row type for credit card queries.
#[derive(Debug, sqlx::FromRow)]
struct CreditCardRow {
    id: i32,
    customer_id: i32,
    cardholder_name: String,
    brand: String,
    last_four: String,
    expiry_month: i16,
    expiry_year: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CreditCardRow> for CreditCard {
    fn from(row: CreditCardRow) -> Self {
        Self {
            id: CreditCardId::new(row.id),
            customer_id: UserId::new(row.customer_id),
            cardholder_name: row.cardholder_name,
            brand: CardBrand::from_db(&row.brand),
            last_four: row.last_four,
            expiry_month: row.expiry_month,
            expiry_year: row.expiry_year,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for credit card database operations.
pub struct CreditCardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CreditCardRepository<'a> {
    /// Create a new credit card repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a card for a customer and return the new card's ID.
    ///
    /// Only the brand and last four digits of the number are persisted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the customer does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        customer_id: UserId,
        input: &CreateCreditCardInput,
    ) -> Result<CreditCardId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO shop.credit_card (
                customer_id, cardholder_name, brand, last_four, expiry_month, expiry_year
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(customer_id)
        .bind(input.cardholder_name.trim())
        .bind(input.card_number.brand().as_str())
        .bind(input.card_number.last_four())
        .bind(input.expiry_month)
        .bind(input.expiry_year)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "credit card"))?;

        Ok(CreditCardId::new(id))
    }

    /// List a customer's cards, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: UserId,
    ) -> Result<Vec<CreditCard>, RepositoryError> {
        let rows = sqlx::query_as::<_, CreditCardRow>(&format!(
            "SELECT {CARD_COLUMNS} FROM shop.credit_card WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete one of a customer's cards. Returns `false` if the card does not
    /// exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        customer_id: UserId,
        id: CreditCardId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.credit_card WHERE id = $1 AND customer_id = $2")
            .bind(id)
            .bind(customer_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
