//! Domain services.
//!
//! - [`checkout`] - the transactional point-of-sale checkout engine
//! - [`roles`] - session-scoped role resolution
//! - [`orders`] - role-aware order location and listing
//! - [`feed`] - the live order feed state machine
//! - [`reorder`] - AI reorder-suggestion client

pub mod checkout;
pub mod feed;
pub mod orders;
pub mod reorder;
pub mod roles;

pub use checkout::{CheckoutEngine, CheckoutError, Receipt};
pub use feed::{FeedError, FeedState, OrderFeed};
pub use orders::{LocateError, OrderDirectory};
pub use reorder::{ReorderClient, ReorderError, ReorderSuggestion, SuggestionInput};
pub use roles::{AccessLevel, RoleError, RoleResolver};
