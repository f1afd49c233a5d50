//! Wishlist items and the merge rule applied when a customer signs in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Price, VariantId};

/// Selected option on a saved variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "Large").
    pub value: String,
}

/// A saved product reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Wishlist identity (the product ID).
    pub id: ItemId,
    /// Product handle used in routing.
    pub handle: String,
    /// Display name.
    pub name: String,
    /// Price when the item was saved.
    pub price: Price,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Variant the customer had selected, if any.
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Options of the selected variant.
    #[serde(default)]
    pub variant_options: Vec<VariantOption>,
}

/// Union of a remote wishlist record and the local (anonymous) wishlist.
///
/// Remote items keep their order and come first, followed by local-only
/// items in local order. When both sides hold the same ID the local copy is
/// kept, since it carries the most recently seen price and image.
#[must_use]
pub fn merge_wishlists(remote: Vec<WishlistItem>, local: &[WishlistItem]) -> Vec<WishlistItem> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(remote.len() + local.len());

    for item in remote {
        if !seen.insert(item.id.clone()) {
            continue;
        }
        let item = local
            .iter()
            .find(|l| l.id == item.id)
            .cloned()
            .unwrap_or(item);
        merged.push(item);
    }

    for item in local {
        if seen.insert(item.id.clone()) {
            merged.push(item.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64) -> WishlistItem {
        WishlistItem {
            id: ItemId::new(id),
            handle: id.to_string(),
            name: id.to_uppercase(),
            price: Price::from_cents(cents),
            image: None,
            variant_id: None,
            variant_options: Vec::new(),
        }
    }

    fn ids(items: &[WishlistItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_merge_is_union_remote_first() {
        let remote = vec![item("fern", 1500), item("cactus", 900)];
        let local = vec![item("pothos", 1200), item("fern", 1500)];

        let merged = merge_wishlists(remote, &local);
        assert_eq!(ids(&merged), ["fern", "cactus", "pothos"]);
    }

    #[test]
    fn test_merge_prefers_local_copy_on_collision() {
        let remote = vec![item("fern", 1500)];
        let local = vec![item("fern", 1300)];

        let merged = merge_wishlists(remote, &local);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].price, Price::from_cents(1300));
    }

    #[test]
    fn test_merge_drops_remote_duplicates() {
        let remote = vec![item("fern", 1500), item("fern", 1500)];
        let merged = merge_wishlists(remote, &[]);
        assert_eq!(ids(&merged), ["fern"]);
    }

    #[test]
    fn test_merge_with_empty_remote_keeps_local() {
        let local = vec![item("pothos", 1200)];
        assert_eq!(merge_wishlists(Vec::new(), &local), local);
    }
}
