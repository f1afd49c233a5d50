//! Wishlist store.

use fernhouse_core::{ItemId, WishlistItem, merge_wishlists};
use tracing::instrument;

use crate::shopify::CommerceApi;
use crate::storage::{LocalStorage, StorageError, keys};

/// Result of merging the remote wishlist on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistSync {
    /// The remote record was fetched and merged. Holds the merged length.
    Merged(usize),
    /// The remote record was unavailable; the local wishlist is unchanged.
    Skipped,
}

/// The visitor's saved items.
#[derive(Debug)]
pub struct WishlistStore<S> {
    storage: S,
    items: Vec<WishlistItem>,
}

impl<S: LocalStorage> WishlistStore<S> {
    /// Hydrate the wishlist from storage. Unreadable values yield an empty list.
    pub async fn load(storage: S) -> Self {
        let items = match storage.load(keys::WISHLIST).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable wishlist");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read wishlist, starting empty");
                Vec::new()
            }
        };

        Self { storage, items }
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Save an item. Re-adding an item already on the list does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist could not be saved.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add_to_wishlist(&mut self, item: WishlistItem) -> Result<(), StorageError> {
        if self.contains(&item.id) {
            return Ok(());
        }

        let mut next = self.items.clone();
        next.push(item);
        self.commit(next).await
    }

    /// Remove an item. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist could not be saved.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove_from_wishlist(&mut self, id: &ItemId) -> Result<(), StorageError> {
        if !self.contains(id) {
            return Ok(());
        }

        let next = self
            .items
            .iter()
            .filter(|item| &item.id != id)
            .cloned()
            .collect();
        self.commit(next).await
    }

    /// Merge the customer's remote wishlist into the local one.
    ///
    /// A failed remote fetch is logged and leaves the local wishlist as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns an error only if the merged wishlist could not be saved.
    #[instrument(skip(self, api, access_token), fields(local = self.items.len()))]
    pub async fn sync_on_login(
        &mut self,
        api: &impl CommerceApi,
        access_token: &str,
    ) -> Result<WishlistSync, StorageError> {
        let remote = match api.get_remote_wishlist(access_token).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, "Remote wishlist unavailable, keeping local wishlist");
                return Ok(WishlistSync::Skipped);
            }
        };

        let merged = merge_wishlists(remote, &self.items);
        let len = merged.len();
        self.commit(merged).await?;

        tracing::info!(items = len, "Wishlist merged");
        Ok(WishlistSync::Merged(len))
    }

    async fn commit(&mut self, next: Vec<WishlistItem>) -> Result<(), StorageError> {
        self.storage
            .save(keys::WISHLIST, serde_json::to_value(&next)?)
            .await?;
        self.items = next;
        Ok(())
    }
}
