//! Fernhouse Core - Shared domain types.
//!
//! This crate provides the types that the storefront's client-side state is
//! built from:
//! - [`CartLineItem`] - A product/variant entry with quantity in the cart
//! - [`WishlistItem`] - A saved product reference
//! - [`CustomerSession`] - The signed-in customer and their access token
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. Persistence and remote calls live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`cart`] - Cart line items
//! - [`wishlist`] - Wishlist items and the login merge rule
//! - [`customer`] - Customer session records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod customer;
pub mod types;
pub mod wishlist;

pub use cart::{CartLineItem, LineItemError};
pub use customer::CustomerSession;
pub use types::*;
pub use wishlist::{VariantOption, WishlistItem, merge_wishlists};
