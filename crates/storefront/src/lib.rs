//! Fernhouse Storefront library.
//!
//! The storefront of a plant retailer backed by the Shopify Storefront API:
//! catalog pages, instant search, a session-held cart and wishlist, and
//! customer login. Exposed as a library so the router can be exercised in
//! tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod search;
pub mod shopify;
pub mod state;
pub mod storage;
pub mod stores;
