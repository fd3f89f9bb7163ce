//! Fixture-backed in-memory data store.
//!
//! Simulates the customer, catalog, order, and cart data owners the
//! notification core queries. Collections load from JSON fixture files
//! and live in memory for the life of the process; the store implements
//! [`storefront_core::DataGateway`] for read access and exposes a handful
//! of mutators the demo publisher services use to drive scenarios.

pub mod store;

pub use store::{DataStore, StoreError};
