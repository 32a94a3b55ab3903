//! Customer repository for database operations.
//!
//! A customer is stored as a `shop.user` row plus a `shop.customer` row
//! sharing its id. Writes that touch both tables run in one transaction.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use bazaar_core::{Email, UserId};

use super::{RepositoryError, amount};
use super::users::UserRow;
use crate::models::{
    CartItem, CreateCustomerInput, Customer, Pagination, UpdateCustomerInput, User,
};

/// Customer rows joined with their user row.
const CUSTOMER_SELECT: &str = r"
    SELECT u.id, u.name, u.email, u.profile_picture, u.created_at,
           GREATEST(u.updated_at, c.updated_at) AS updated_at,
           c.balance, c.cart
    FROM shop.customer c
    JOIN shop.user u ON u.id = c.user_id
";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    #[sqlx(flatten)]
    user: UserRow,
    balance: Decimal,
    cart: Json<Vec<CartItem>>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user: User::try_from(row.user)?,
            balance: amount(row.balance),
            cart: row.cart.0,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Customer CRUD
    // =========================================================================

    /// Create a user and its customer row. The cart starts empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateCustomerInput) -> Result<Customer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO shop.user (name, email, profile_picture)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(input.user.name.trim())
        .bind(input.user.email.as_str())
        .bind(input.user.profile_picture.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "user with this email"))?;

        sqlx::query("INSERT INTO shop.customer (user_id, balance) VALUES ($1, $2)")
            .bind(user_id)
            .bind(input.balance)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, "customer"))?;

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "{CUSTOMER_SELECT} WHERE c.user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "{CUSTOMER_SELECT} WHERE c.user_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Check whether a customer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM shop.customer WHERE user_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// List customers ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, page: Pagination) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "{CUSTOMER_SELECT} ORDER BY c.user_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    /// Apply a partial update to the user fields and balance.
    ///
    /// Returns `None` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        input: &UpdateCustomerInput,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> =
            sqlx::query_scalar("SELECT user_id FROM shop.customer WHERE user_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let user = &input.user;
        if user.name.is_some() || user.email.is_some() || user.profile_picture.is_some() {
            sqlx::query(
                r"
                UPDATE shop.user
                SET name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    profile_picture = COALESCE($4, profile_picture)
                WHERE id = $1
                ",
            )
            .bind(id)
            .bind(user.name.as_deref().map(str::trim))
            .bind(user.email.as_ref().map(Email::as_str))
            .bind(user.profile_picture.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, "user with this email"))?;
        }

        if let Some(balance) = input.balance {
            sqlx::query("UPDATE shop.customer SET balance = $2 WHERE user_id = $1")
                .bind(id)
                .bind(balance)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "{CUSTOMER_SELECT} WHERE c.user_id = $1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Customer::try_from(row).map(Some)
    }

    /// Delete a customer, its addresses, credit cards and user row.
    ///
    /// Returns `true` if the customer existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> =
            sqlx::query_scalar("SELECT user_id FROM shop.customer WHERE user_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query(
            r"
            DELETE FROM shop.address
            WHERE addressable_type = 'customer' AND addressable_id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // Cascades to shop.customer and shop.credit_card.
        sqlx::query("DELETE FROM shop.user WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Append a line to the customer's cart and persist it.
    ///
    /// Lines are not merged: adding the same product twice yields two lines.
    /// Returns the cart after the append, or `None` if the customer does not
    /// exist. The product row is share-locked by the append itself, so a
    /// concurrent product delete either sees the new line or makes the
    /// append fail.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the customer exists but
    /// the product does not.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_to_cart(
        &self,
        id: UserId,
        item: CartItem,
    ) -> Result<Option<Vec<CartItem>>, RepositoryError> {
        let cart: Option<Json<Vec<CartItem>>> = sqlx::query_scalar(
            r"
            UPDATE shop.customer
            SET cart = cart || jsonb_build_array($2::jsonb)
            WHERE user_id = $1
              AND EXISTS (SELECT 1 FROM shop.product WHERE id = $3 FOR SHARE)
            RETURNING cart
            ",
        )
        .bind(id)
        .bind(Json(item))
        .bind(item.product_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(cart) = cart {
            return Ok(Some(cart.0));
        }
        if !self.exists(id).await? {
            return Ok(None);
        }
        Err(RepositoryError::InvalidReference(format!(
            "product {} does not exist",
            item.product_id
        )))
    }

    /// Get the customer's cart, or `None` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_cart(&self, id: UserId) -> Result<Option<Vec<CartItem>>, RepositoryError> {
        let cart: Option<Json<Vec<CartItem>>> =
            sqlx::query_scalar("SELECT cart FROM shop.customer WHERE user_id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(cart.map(|c| c.0))
    }

    /// Empty the customer's cart. Returns `false` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_cart(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE shop.customer SET cart = '[]'::jsonb WHERE user_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
