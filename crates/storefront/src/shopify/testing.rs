//! In-memory `CommerceApi` used by store and search tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, Utc};
use fernhouse_core::{CustomerId, ItemId, Price, VariantId, WishlistItem};

use super::{
    AccessToken, CheckoutLine, CommerceApi, CustomerRecord, LoginError, ProductSummary,
    ShopifyError, UserError,
};

pub const VALID_EMAIL: &str = "ivy@example.com";
pub const VALID_PASSWORD: &str = "correct horse";
pub const VALID_TOKEN: &str = "tok_fake_123";

/// Scripted commerce platform with call counters.
#[derive(Default)]
pub struct FakeCommerce {
    pub remote_wishlist: Mutex<Vec<WishlistItem>>,
    pub wishlist_unavailable: bool,
    pub search_unavailable: bool,
    pub catalog: Vec<ProductSummary>,
    pub checkout_lines: Mutex<Vec<CheckoutLine>>,
    pub login_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub wishlist_calls: AtomicUsize,
    pub deleted_tokens: AtomicUsize,
}

impl FakeCommerce {
    pub fn with_catalog(names: &[&str]) -> Self {
        Self {
            catalog: names.iter().map(|name| product(name, 1500)).collect(),
            ..Self::default()
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn product(name: &str, cents: i64) -> ProductSummary {
    let handle = name.to_lowercase().replace(' ', "-");
    ProductSummary {
        id: ItemId::new(format!("gid://shopify/Product/{handle}")),
        handle: handle.clone(),
        title: name.to_string(),
        price: Price::from_cents(cents),
        image: None,
        default_variant_id: Some(VariantId::new(format!(
            "gid://shopify/ProductVariant/{handle}"
        ))),
        available_for_sale: true,
    }
}

impl CommerceApi for FakeCommerce {
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, LoginError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if email.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }
        if email != VALID_EMAIL || password != VALID_PASSWORD {
            return Err(LoginError::Rejected(vec![UserError {
                code: Some("UNIDENTIFIED_CUSTOMER".to_string()),
                field: vec!["input".to_string()],
                message: "Unidentified customer".to_string(),
            }]));
        }
        Ok(AccessToken {
            access_token: VALID_TOKEN.to_string(),
            expires_at: Utc::now() + Duration::days(30),
        })
    }

    async fn get_customer_data(
        &self,
        access_token: &str,
    ) -> Result<Option<CustomerRecord>, ShopifyError> {
        if access_token != VALID_TOKEN {
            return Ok(None);
        }
        Ok(Some(CustomerRecord {
            id: CustomerId::new("gid://shopify/Customer/7"),
            email: Some(VALID_EMAIL.to_string()),
            first_name: Some("Ivy".to_string()),
            last_name: Some("Green".to_string()),
        }))
    }

    async fn search_products(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, ShopifyError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.search_unavailable {
            return Err(ShopifyError::RateLimited(1));
        }
        let query = query.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&query))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn get_remote_wishlist(
        &self,
        _access_token: &str,
    ) -> Result<Vec<WishlistItem>, ShopifyError> {
        self.wishlist_calls.fetch_add(1, Ordering::SeqCst);
        if self.wishlist_unavailable {
            return Err(ShopifyError::NotFound("wishlist".to_string()));
        }
        Ok(self
            .remote_wishlist
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default())
    }

    async fn create_checkout(&self, lines: &[CheckoutLine]) -> Result<String, ShopifyError> {
        if let Ok(mut seen) = self.checkout_lines.lock() {
            seen.extend_from_slice(lines);
        }
        Ok("https://fernhouse.myshopify.com/cart/c/fake".to_string())
    }

    async fn delete_access_token(&self, _access_token: &str) -> Result<(), ShopifyError> {
        self.deleted_tokens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
