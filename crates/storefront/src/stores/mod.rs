//! Per-visitor client state: cart, wishlist and signed-in customer.
//!
//! Each store owns a [`LocalStorage`](crate::storage::LocalStorage) handle
//! and keeps one JSON value under its key. Route handlers open the stores
//! over the visitor's session for the duration of a request.

pub mod cart;
pub mod session;
pub mod wishlist;

pub use cart::{CartError, CartStore};
pub use session::{LoginOutcome, SessionStore};
pub use wishlist::{WishlistStore, WishlistSync};
