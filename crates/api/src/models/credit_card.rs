//! Credit card domain types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{CardBrand, CardNumber, CreditCardId, UserId};

use super::{ValidationError, require_text};

/// How many years ahead an expiry date may be.
pub const MAX_EXPIRY_YEARS_AHEAD: i32 = 20;

/// A stored credit card. Only the last four digits are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditCard {
    pub id: CreditCardId,
    /// Owning customer.
    pub customer_id: UserId,
    pub cardholder_name: String,
    pub brand: CardBrand,
    pub last_four: String,
    pub expiry_month: i16,
    pub expiry_year: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for adding a credit card to a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCreditCardInput {
    pub cardholder_name: String,
    pub card_number: CardNumber,
    pub expiry_month: i16,
    pub expiry_year: i16,
}

impl CreateCreditCardInput {
    /// Validate the card against the calendar date `today`.
    ///
    /// A card is valid through the last day of its expiry month.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank cardholder, an impossible month,
    /// an expired card, or an expiry too far in the future.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        require_text("cardholder_name", &self.cardholder_name)?;

        if !(1..=12).contains(&self.expiry_month) {
            return Err(ValidationError::new(
                "expiry_month",
                "must be between 1 and 12",
            ));
        }

        let year = i32::from(self.expiry_year);
        let month = u32::try_from(self.expiry_month).unwrap_or_default();
        if (year, month) < (today.year(), today.month()) {
            return Err(ValidationError::new("expiry_year", "card has expired"));
        }
        if year > today.year() + MAX_EXPIRY_YEARS_AHEAD {
            return Err(ValidationError::new(
                "expiry_year",
                format!("must be within {MAX_EXPIRY_YEARS_AHEAD} years"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(month: i16, year: i16) -> CreateCreditCardInput {
        serde_json::from_value(serde_json::json!({
            "cardholder_name": "Ada Lovelace",
            "card_number": "4242 4242 4242 4242",
            "expiry_month": month,
            "expiry_year": year,
        }))
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    #[test]
    fn test_valid_card() {
        assert!(input(12, 2028).validate(today()).is_ok());
    }

    #[test]
    fn test_current_month_still_valid() {
        assert!(input(6, 2026).validate(today()).is_ok());
    }

    #[test]
    fn test_expired_card() {
        let err = input(5, 2026).validate(today()).unwrap_err();
        assert_eq!(err.field, "expiry_year");
    }

    #[test]
    fn test_bad_month() {
        assert_eq!(
            input(13, 2028).validate(today()).unwrap_err().field,
            "expiry_month"
        );
        assert_eq!(
            input(0, 2028).validate(today()).unwrap_err().field,
            "expiry_month"
        );
    }

    #[test]
    fn test_far_future_expiry() {
        assert!(input(1, 2050).validate(today()).is_err());
    }

    #[test]
    fn test_bad_card_number_fails_deserialization() {
        let result: Result<CreateCreditCardInput, _> = serde_json::from_value(serde_json::json!({
            "cardholder_name": "Ada Lovelace",
            "card_number": "4242 4242 4242 4241",
            "expiry_month": 1,
            "expiry_year": 2030,
        }));
        assert!(result.is_err());
    }
}
