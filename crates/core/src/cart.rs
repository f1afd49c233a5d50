//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Price, VariantId};

/// Reasons a line item cannot enter the cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    /// The item has no line identity to merge on.
    #[error("item is missing an id")]
    MissingId,
    /// The item has no purchasable variant selected.
    #[error("please select a size or option before adding to cart")]
    MissingVariant,
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// Unit prices cannot be below zero.
    #[error("price cannot be negative")]
    NegativePrice,
}

/// A single product/variant entry in the cart.
///
/// ## Invariants
///
/// - `id` is never blank (lines are merged by it)
/// - `quantity >= 1` while the line is in the cart
/// - `variant_id` is never blank (checkout needs it as merchandise ID)
/// - `price` is not negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Line identity. Adding an item with an existing ID merges quantities.
    pub id: ItemId,
    /// The purchasable variant handed to checkout.
    pub variant_id: VariantId,
    /// Product handle, used to link back to the product.
    #[serde(default)]
    pub handle: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Number of units.
    pub quantity: u32,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Selected size, if the product has one.
    #[serde(default)]
    pub size: Option<String>,
    /// Selected color, if the product has one.
    #[serde(default)]
    pub color: Option<String>,
}

impl CartLineItem {
    /// Check the item can be put in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or variant is blank, the quantity is zero
    /// or the price is negative.
    pub fn validate(&self) -> Result<(), LineItemError> {
        if self.id.is_blank() {
            return Err(LineItemError::MissingId);
        }
        if self.variant_id.is_blank() {
            return Err(LineItemError::MissingVariant);
        }
        if self.quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }
        if self.price.is_negative() {
            return Err(LineItemError::NegativePrice);
        }
        Ok(())
    }

    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// Variant description for display, e.g. "Large / Terracotta".
    #[must_use]
    pub fn variant_label(&self) -> Option<String> {
        match (self.size.as_deref(), self.color.as_deref()) {
            (Some(size), Some(color)) => Some(format!("{size} / {color}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, cents: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: ItemId::new(id),
            variant_id: VariantId::new(format!("gid://shopify/ProductVariant/{id}")),
            handle: format!("plant-{id}"),
            name: format!("Plant {id}"),
            price: Price::from_cents(cents),
            quantity,
            image: None,
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line("1", 1000, 2).line_total(), Price::from_cents(2000));
    }

    #[test]
    fn test_validate_rejects_missing_variant() {
        let mut item = line("1", 1000, 1);
        item.variant_id = VariantId::new(" ");
        assert_eq!(item.validate(), Err(LineItemError::MissingVariant));
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let mut item = line("1", 1000, 1);
        item.id = ItemId::new("");
        assert_eq!(item.validate(), Err(LineItemError::MissingId));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        assert_eq!(line("1", -500, 1).validate(), Err(LineItemError::NegativePrice));
        assert_eq!(line("1", 0, 1).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        assert_eq!(line("1", 1000, 0).validate(), Err(LineItemError::ZeroQuantity));
        assert_eq!(line("1", 1000, 1).validate(), Ok(()));
    }

    #[test]
    fn test_variant_label() {
        let mut item = line("1", 1000, 1);
        assert_eq!(item.variant_label(), None);
        item.size = Some("6\" pot".to_string());
        assert_eq!(item.variant_label().as_deref(), Some("6\" pot"));
        item.color = Some("Terracotta".to_string());
        assert_eq!(item.variant_label().as_deref(), Some("6\" pot / Terracotta"));
    }
}
