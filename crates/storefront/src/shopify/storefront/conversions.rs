//! Conversions from raw GraphQL response shapes to domain types.

use chrono::{DateTime, Utc};
use fernhouse_core::{CustomerId, ItemId, Price, VariantId, WishlistItem};

use super::queries::{
    RawCollectionSummary, RawImage, RawMoney, RawProductSummary, RawUserError,
    customer_access_token_create, get_customer,
};
use crate::shopify::ShopifyError;
use crate::shopify::types::{
    AccessToken, CollectionSummary, CustomerRecord, Image, ProductSummary, UserError,
};

pub fn convert_money(money: &RawMoney) -> Result<Price, ShopifyError> {
    money
        .amount
        .parse::<Price>()
        .map_err(|e| ShopifyError::InvalidData(format!("price {:?}: {e}", money.amount)))
}

pub fn convert_image(image: RawImage) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
    }
}

pub fn convert_product_summary(product: RawProductSummary) -> Result<ProductSummary, ShopifyError> {
    let price = convert_money(&product.price_range.min_variant_price)?;
    let default_variant_id = product
        .variants
        .nodes
        .into_iter()
        .next()
        .map(|v| VariantId::new(v.id));

    Ok(ProductSummary {
        id: ItemId::new(product.id),
        handle: product.handle,
        title: product.title,
        price,
        image: product.featured_image.map(convert_image),
        default_variant_id,
        available_for_sale: product.available_for_sale,
    })
}

pub fn convert_product_summaries(
    products: Vec<RawProductSummary>,
) -> Result<Vec<ProductSummary>, ShopifyError> {
    products.into_iter().map(convert_product_summary).collect()
}

pub fn convert_collection_summary(collection: RawCollectionSummary) -> CollectionSummary {
    CollectionSummary {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
    }
}

pub fn convert_user_error(error: RawUserError) -> UserError {
    UserError {
        code: error.code,
        field: error.field.unwrap_or_default(),
        message: error.message,
    }
}

pub fn convert_customer(customer: get_customer::Customer) -> CustomerRecord {
    CustomerRecord {
        id: CustomerId::new(customer.id),
        email: customer.email,
        first_name: customer.first_name,
        last_name: customer.last_name,
    }
}

/// Convert a created token. `None` if the token is absent or malformed.
pub fn convert_access_token(token: customer_access_token_create::Token) -> Option<AccessToken> {
    let access_token = token.access_token.filter(|t| !t.trim().is_empty())?;
    let expires_at = token
        .expires_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&Utc);

    Some(AccessToken {
        access_token,
        expires_at,
    })
}

/// Parse the JSON array stored in the customer's wishlist metafield.
pub fn convert_wishlist_metafield(value: &str) -> Result<Vec<WishlistItem>, ShopifyError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(value)?)
}
