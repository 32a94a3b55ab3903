//! Payment card number type.
//!
//! Only the brand and the last four digits ever leave this module; the full
//! number is validated and dropped.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CardNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardNumberError {
    /// The input contains something other than digits, spaces or dashes.
    #[error("card number may only contain digits, spaces and dashes")]
    InvalidCharacter,
    /// Too few or too many digits.
    #[error("card number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
    /// The Luhn checksum does not match.
    #[error("card number checksum is invalid")]
    ChecksumMismatch,
}

/// Card network inferred from the number's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the stored representation, falling back to `Unknown`.
    #[must_use]
    pub fn from_db(s: &str) -> Self {
        match s {
            "visa" => Self::Visa,
            "mastercard" => Self::Mastercard,
            "amex" => Self::Amex,
            "discover" => Self::Discover,
            _ => Self::Unknown,
        }
    }

    fn detect(digits: &str) -> Self {
        let prefix2: u32 = digits.get(..2).and_then(|p| p.parse().ok()).unwrap_or(0);
        let prefix4: u32 = digits.get(..4).and_then(|p| p.parse().ok()).unwrap_or(0);

        if digits.starts_with('4') {
            Self::Visa
        } else if (51..=55).contains(&prefix2) || (2221..=2720).contains(&prefix4) {
            Self::Mastercard
        } else if prefix2 == 34 || prefix2 == 37 {
            Self::Amex
        } else if prefix4 == 6011 || prefix2 == 65 {
            Self::Discover
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated primary account number.
///
/// ```
/// use bazaar_core::{CardBrand, CardNumber};
///
/// let card = CardNumber::parse("4111 1111 1111 1111").unwrap();
/// assert_eq!(card.brand(), CardBrand::Visa);
/// assert_eq!(card.last_four(), "1111");
/// assert_eq!(format!("{card}"), "visa ending in 1111");
///
/// assert!(CardNumber::parse("4111 1111 1111 1112").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber {
    digits: String,
}

impl CardNumber {
    /// Minimum number of digits (ISO/IEC 7812).
    pub const MIN_DIGITS: usize = 12;
    /// Maximum number of digits (ISO/IEC 7812).
    pub const MAX_DIGITS: usize = 19;

    /// Parse a card number, ignoring spaces and dashes.
    ///
    /// # Errors
    ///
    /// Returns a [`CardNumberError`] if the input has foreign characters, the
    /// wrong number of digits, or fails the Luhn check.
    pub fn parse(s: &str) -> Result<Self, CardNumberError> {
        let mut digits = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(CardNumberError::InvalidCharacter),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(CardNumberError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        if !luhn_valid(&digits) {
            return Err(CardNumberError::ChecksumMismatch);
        }

        Ok(Self { digits })
    }

    /// Card network for this number.
    #[must_use]
    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(&self.digits)
    }

    /// The last four digits, safe to store and display.
    #[must_use]
    pub fn last_four(&self) -> &str {
        let start = self.digits.len().saturating_sub(4);
        self.digits.get(start..).unwrap_or_default()
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardNumber")
            .field("brand", &self.brand())
            .field("last_four", &self.last_four())
            .finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ending in {}", self.brand(), self.last_four())
    }
}

impl std::str::FromStr for CardNumber {
    type Err = CardNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_test_numbers() {
        let cases = [
            ("4242424242424242", CardBrand::Visa),
            ("5555 5555 5555 4444", CardBrand::Mastercard),
            ("2223-0031-2200-3222", CardBrand::Mastercard),
            ("378282246310005", CardBrand::Amex),
            ("6011111111111117", CardBrand::Discover),
        ];
        for (number, brand) in cases {
            let card = CardNumber::parse(number).unwrap();
            assert_eq!(card.brand(), brand, "{number}");
        }
    }

    #[test]
    fn test_last_four() {
        let card = CardNumber::parse("378282246310005").unwrap();
        assert_eq!(card.last_four(), "0005");
    }

    #[test]
    fn test_rejects_bad_checksum() {
        assert_eq!(
            CardNumber::parse("4242424242424241"),
            Err(CardNumberError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_rejects_letters_and_lengths() {
        assert_eq!(
            CardNumber::parse("4242x42424242424"),
            Err(CardNumberError::InvalidCharacter)
        );
        assert!(matches!(
            CardNumber::parse("4242"),
            Err(CardNumberError::InvalidLength { .. })
        ));
        assert!(matches!(
            CardNumber::parse(&"4".repeat(20)),
            Err(CardNumberError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_debug_never_prints_full_number() {
        let card = CardNumber::parse("4242424242424242").unwrap();
        let debug = format!("{card:?}");
        assert!(!debug.contains("4242424242424242"));
        assert!(debug.contains("4242"));
    }

    #[test]
    fn test_brand_db_roundtrip() {
        for brand in [
            CardBrand::Visa,
            CardBrand::Mastercard,
            CardBrand::Amex,
            CardBrand::Discover,
            CardBrand::Unknown,
        ] {
            assert_eq!(CardBrand::from_db(brand.as_str()), brand);
        }
        assert_eq!(CardBrand::from_db("diners"), CardBrand::Unknown);
    }
}
