//! Cart store.
//!
//! Line items live in local storage under [`keys::CART`]. Every mutation
//! writes the whole collection back; the in-memory cart only changes once
//! that write has succeeded.

use fernhouse_core::{CartLineItem, ItemId, LineItemError, Price};
use thiserror::Error;
use tracing::instrument;

use crate::shopify::{CheckoutLine, CommerceApi, ShopifyError};
use crate::storage::{LocalStorage, StorageError, keys};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The item cannot be added as given.
    #[error(transparent)]
    Invalid(#[from] LineItemError),

    /// Checkout was requested with nothing in the cart.
    #[error("cart is empty")]
    Empty,

    /// The cart could not be written.
    #[error("failed to save cart: {0}")]
    Storage(#[from] StorageError),

    /// The platform refused or failed to create a checkout.
    #[error("checkout failed: {0}")]
    Checkout(#[from] ShopifyError),
}

/// The visitor's cart.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    lines: Vec<CartLineItem>,
}

impl<S: LocalStorage> CartStore<S> {
    /// Hydrate the cart from storage.
    ///
    /// An absent or unreadable value yields an empty cart.
    pub async fn load(storage: S) -> Self {
        let lines = match storage.load(keys::CART).await {
            Ok(Some(value)) => serde_json::from_value::<Vec<CartLineItem>>(value)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Discarding unreadable cart");
                    Vec::new()
                }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart, starting empty");
                Vec::new()
            }
        };

        Self { storage, lines }
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Add an item, merging with an existing line of the same ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Invalid` if the item has no variant or a zero
    /// quantity, and `CartError::Storage` if the cart could not be saved.
    #[instrument(skip(self, item), fields(item_id = %item.id, quantity = item.quantity))]
    pub async fn add_to_cart(&mut self, item: CartLineItem) -> Result<(), CartError> {
        item.validate()?;

        let mut next = self.lines.clone();
        match next.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => next.push(item),
        }

        self.commit(next).await
    }

    /// Remove the line with `id`. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart could not be saved.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove_from_cart(&mut self, id: &ItemId) -> Result<(), CartError> {
        if !self.lines.iter().any(|line| &line.id == id) {
            return Ok(());
        }

        let next = self
            .lines
            .iter()
            .filter(|line| &line.id != id)
            .cloned()
            .collect();
        self.commit(next).await
    }

    /// Set the quantity of the line with `id`.
    ///
    /// A quantity of zero or less removes the line. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart could not be saved.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn update_quantity(&mut self, id: &ItemId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(id).await;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut next = self.lines.clone();
        let Some(line) = next.iter_mut().find(|line| &line.id == id) else {
            return Ok(());
        };
        if line.quantity == quantity {
            return Ok(());
        }
        line.quantity = quantity;

        self.commit(next).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the stored cart could not be removed.
    pub async fn clear(&mut self) -> Result<(), CartError> {
        self.storage.remove(keys::CART).await?;
        self.lines.clear();
        Ok(())
    }

    /// Hand the cart to the platform and return its checkout URL.
    ///
    /// The cart is cleared once the platform has accepted it. If clearing
    /// fails the URL is still returned, since the checkout already exists.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` for an empty cart and
    /// `CartError::Checkout` if the platform call fails.
    #[instrument(skip(self, api), fields(lines = self.lines.len()))]
    pub async fn checkout(&mut self, api: &impl CommerceApi) -> Result<String, CartError> {
        if self.lines.is_empty() {
            return Err(CartError::Empty);
        }

        let snapshot: Vec<CheckoutLine> = self
            .lines
            .iter()
            .map(|line| CheckoutLine {
                merchandise_id: line.variant_id.clone(),
                quantity: line.quantity,
            })
            .collect();

        let url = api.create_checkout(&snapshot).await?;

        if let Err(e) = self.clear().await {
            tracing::warn!(error = %e, "Checkout created but cart could not be cleared");
        }

        Ok(url)
    }

    async fn commit(&mut self, next: Vec<CartLineItem>) -> Result<(), CartError> {
        self.storage
            .save(keys::CART, serde_json::to_value(&next).map_err(StorageError::from)?)
            .await?;
        self.lines = next;
        Ok(())
    }
}
