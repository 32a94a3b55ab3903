//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod addressable;
pub mod card;
pub mod email;
pub mod id;

pub use addressable::AddressableType;
pub use card::{CardBrand, CardNumber, CardNumberError};
pub use email::{Email, EmailError};
pub use id::*;
