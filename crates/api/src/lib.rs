//! Bazaar API library.
//!
//! JSON/HTTP e-commerce backend: users, customers with credit cards,
//! addresses and carts, products, warehouses and stock. Exposed as a library
//! so the router can be tested and the CLI can reuse the repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
