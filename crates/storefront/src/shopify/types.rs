//! Domain types for Shopify Storefront API responses.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response shapes in `storefront::queries`.

use chrono::{DateTime, Utc};
use fernhouse_core::{CustomerId, ItemId, Price, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Customer Types
// =============================================================================

/// Customer access token created from email and password.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The access token for customer-scoped API calls.
    pub access_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// An error reported by a customer mutation (e.g., bad credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Machine-readable error code, when Shopify provides one.
    pub code: Option<String>,
    /// Path to the input field at fault.
    pub field: Vec<String>,
    /// Human-readable message, shown to the customer verbatim.
    pub message: String,
}

/// A Shopify customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer ID.
    pub id: CustomerId,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
}

impl CustomerRecord {
    /// Full name assembled from first and last names.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { None } else { Some(name) }
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// The product fields shown in search results and collection grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: ItemId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Lowest variant price.
    pub price: Price,
    /// Featured image.
    pub image: Option<Image>,
    /// First variant, used for one-click add to cart.
    pub default_variant_id: Option<VariantId>,
    /// Whether any variant is available.
    pub available_for_sale: bool,
}

/// A collection without its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Collection ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Collection image.
    pub image: Option<Image>,
}

/// A collection with a page of its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetail {
    /// The collection itself.
    pub collection: CollectionSummary,
    /// Products in this collection.
    pub products: Vec<ProductSummary>,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// One line of the cart snapshot handed to checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    /// Variant to purchase.
    pub merchandise_id: VariantId,
    /// Number of units.
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let mut customer = CustomerRecord {
            id: CustomerId::new("gid://shopify/Customer/1"),
            email: Some("ivy@example.com".to_string()),
            first_name: Some("Ivy".to_string()),
            last_name: None,
        };
        assert_eq!(customer.full_name().as_deref(), Some("Ivy"));

        customer.last_name = Some("Green".to_string());
        assert_eq!(customer.full_name().as_deref(), Some("Ivy Green"));

        customer.first_name = Some(" ".to_string());
        customer.last_name = None;
        assert_eq!(customer.full_name(), None);
    }

    #[test]
    fn test_checkout_line_serializes_camel_case() {
        let line = CheckoutLine {
            merchandise_id: VariantId::new("gid://shopify/ProductVariant/9"),
            quantity: 2,
        };
        let json = serde_json::to_value(&line).unwrap_or_default();
        assert_eq!(json["merchandiseId"], "gid://shopify/ProductVariant/9");
        assert_eq!(json["quantity"], 2);
    }
}
