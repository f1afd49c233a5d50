//! Cache types for Storefront API responses.

use crate::shopify::types::{CollectionDetail, CollectionSummary};

/// Cache key for collection listings.
pub fn collections_key(limit: u32) -> String {
    format!("collections:{limit}")
}

/// Cache key for a single collection page.
pub fn collection_key(handle: &str, limit: u32) -> String {
    format!("collection:{handle}:{limit}")
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Collections(Vec<CollectionSummary>),
    Collection(Box<CollectionDetail>),
}
