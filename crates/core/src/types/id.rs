//! Newtype IDs for type-safe entity references.
//!
//! Commerce platform identifiers are opaque strings (Shopify uses global IDs
//! such as `gid://shopify/ProductVariant/123`). The `define_id!` macro wraps
//! them so a variant ID can never be passed where an item ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `is_blank()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use fernhouse_core::define_id;
/// define_id!(OrderId);
/// define_id!(AddressId);
///
/// let order_id = OrderId::new("gid://shopify/Order/1");
/// let address_id = AddressId::new("gid://shopify/MailingAddress/1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = address_id;
/// assert_eq!(order_id.as_str(), "gid://shopify/Order/1");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is empty or only whitespace.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Identity of a cart line or wishlist entry.
define_id!(ItemId);
define_id!(VariantId);
define_id!(CustomerId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = VariantId::new("gid://shopify/ProductVariant/42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/ProductVariant/42\"");

        let back: VariantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_ids() {
        assert!(VariantId::new("").is_blank());
        assert!(VariantId::new("   ").is_blank());
        assert!(!VariantId::new("v-1").is_blank());
        assert!(VariantId::default().is_blank());
    }

    #[test]
    fn test_display_matches_inner() {
        let id = ItemId::from("monstera-6in");
        assert_eq!(id.to_string(), "monstera-6in");
        assert_eq!(String::from(id), "monstera-6in");
    }
}
