//! StockVision Core - Shared domain types.
//!
//! This crate provides the common types used across all StockVision
//! components:
//! - `server` - HTTP API, document store, and domain services
//! - `integration-tests` - Router-level test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, statuses, and
//!   the order-partition owner (including the anonymous point-of-sale
//!   sentinel)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
