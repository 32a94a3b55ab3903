//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `api` - JSON/HTTP backend (users, customers, catalog, stock)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, card numbers and
//!   polymorphic address owners

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
