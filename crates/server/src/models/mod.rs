//! Domain documents and the client-held cart.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartError, CartLine};
pub use order::{NewOrder, Order, OrderLine};
pub use product::Product;
pub use user::UserProfile;
