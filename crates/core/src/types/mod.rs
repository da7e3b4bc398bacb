//! Core types for StockVision.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod owner;
pub mod price;
pub mod status;

pub use id::*;
pub use owner::{ANONYMOUS_POS_SALE, OwnerId};
pub use price::Price;
pub use status::*;
