//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Caches collections using `moka` (5-minute TTL).

mod cache;
mod conversions;

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use fernhouse_core::WishlistItem;
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    AccessToken, CheckoutLine, CollectionDetail, CollectionSummary, CustomerRecord,
    ProductSummary,
};
use crate::shopify::{CommerceApi, GraphQLError, GraphQLErrorLocation, LoginError, ShopifyError};

use cache::{CacheValue, collection_key, collections_key};
use conversions::{
    convert_access_token, convert_collection_summary, convert_customer,
    convert_product_summaries, convert_user_error, convert_wishlist_metafield,
};
use queries::{
    CartCreate, CustomerAccessTokenCreate, CustomerAccessTokenDelete, GetCollectionByHandle,
    GetCollections, GetCustomer, GetCustomerWishlist, SearchProducts, cart_create,
    customer_access_token_create, customer_access_token_delete, get_collection_by_handle,
    get_collections, get_customer, get_customer_wishlist, search_products,
};

/// Longest response body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; all clones share one HTTP connection pool and cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(200)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                access_token: config.storefront_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %excerpt(&response_text, LOG_BODY_LIMIT),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError {
                message: format!("HTTP {status}: {}", excerpt(&response_text, 200)),
                locations: vec![],
                path: vec![],
            }]));
        }

        parse_response::<Q::ResponseData>(request_body.operation_name, &response_text)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// List collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self, limit: u32) -> Result<Vec<CollectionSummary>, ShopifyError> {
        let cache_key = collections_key(limit);

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data = self
            .execute::<GetCollections>(get_collections::Variables {
                first: i64::from(limit),
            })
            .await?;

        let collections: Vec<CollectionSummary> = data
            .collections
            .nodes
            .into_iter()
            .map(convert_collection_summary)
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(collections.clone()))
            .await;

        Ok(collections)
    }

    /// Get a collection and the first `limit` of its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_products(
        &self,
        handle: &str,
        limit: u32,
    ) -> Result<CollectionDetail, ShopifyError> {
        let cache_key = collection_key(handle, limit);

        if let Some(CacheValue::Collection(detail)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*detail);
        }

        let data = self
            .execute::<GetCollectionByHandle>(get_collection_by_handle::Variables {
                handle: handle.to_string(),
                first: i64::from(limit),
            })
            .await?;

        let collection = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        let detail = CollectionDetail {
            collection: convert_collection_summary(collection.summary),
            products: convert_product_summaries(collection.products.nodes)?,
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collection(Box::new(detail.clone())))
            .await;

        Ok(detail)
    }
}

impl CommerceApi for StorefrontClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, LoginError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let data = self
            .execute::<CustomerAccessTokenCreate>(customer_access_token_create::Variables {
                input: customer_access_token_create::Input {
                    email: email.trim().to_string(),
                    password: password.to_string(),
                },
            })
            .await?;

        let payload = data
            .customer_access_token_create
            .ok_or(LoginError::InvalidToken)?;

        if !payload.customer_user_errors.is_empty() {
            return Err(LoginError::Rejected(
                payload
                    .customer_user_errors
                    .into_iter()
                    .map(convert_user_error)
                    .collect(),
            ));
        }

        payload
            .customer_access_token
            .and_then(convert_access_token)
            .ok_or(LoginError::InvalidToken)
    }

    #[instrument(skip(self, access_token))]
    async fn get_customer_data(
        &self,
        access_token: &str,
    ) -> Result<Option<CustomerRecord>, ShopifyError> {
        let data = self
            .execute::<GetCustomer>(get_customer::Variables {
                customer_access_token: access_token.to_string(),
            })
            .await?;

        Ok(data.customer.map(convert_customer))
    }

    #[instrument(skip(self))]
    async fn search_products(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, ShopifyError> {
        let data = self
            .execute::<SearchProducts>(search_products::Variables {
                query: query.to_string(),
                first: i64::from(limit),
            })
            .await?;

        convert_product_summaries(data.products.nodes)
    }

    #[instrument(skip(self, access_token))]
    async fn get_remote_wishlist(
        &self,
        access_token: &str,
    ) -> Result<Vec<WishlistItem>, ShopifyError> {
        let data = self
            .execute::<GetCustomerWishlist>(get_customer_wishlist::Variables {
                customer_access_token: access_token.to_string(),
            })
            .await?;

        let customer = data
            .customer
            .ok_or_else(|| ShopifyError::NotFound("Customer for access token".to_string()))?;

        match customer.wishlist {
            Some(metafield) => convert_wishlist_metafield(&metafield.value),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn create_checkout(&self, lines: &[CheckoutLine]) -> Result<String, ShopifyError> {
        let data = self
            .execute::<CartCreate>(cart_create::Variables {
                input: cart_create::Input {
                    lines: lines.to_vec(),
                },
            })
            .await?;

        let payload = data
            .cart_create
            .ok_or_else(|| ShopifyError::InvalidData("cartCreate returned no payload".to_string()))?;

        if let Some(error) = payload.user_errors.into_iter().next() {
            return Err(ShopifyError::UserError(error.message));
        }

        payload
            .cart
            .map(|cart| cart.checkout_url)
            .ok_or_else(|| ShopifyError::InvalidData("cartCreate returned no cart".to_string()))
    }

    #[instrument(skip(self, access_token))]
    async fn delete_access_token(&self, access_token: &str) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerAccessTokenDelete>(customer_access_token_delete::Variables {
                customer_access_token: access_token.to_string(),
            })
            .await?;

        if let Some(error) = data
            .customer_access_token_delete
            .and_then(|payload| payload.user_errors.into_iter().next())
        {
            return Err(ShopifyError::UserError(error.message));
        }

        Ok(())
    }
}

/// Parse a GraphQL response body, surfacing GraphQL-level errors.
fn parse_response<T: serde::de::DeserializeOwned>(
    operation: &str,
    response_text: &str,
) -> Result<T, ShopifyError> {
    let response: Response<T> = match serde_json::from_str(response_text) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                operation,
                body = %excerpt(response_text, LOG_BODY_LIMIT),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, operation, "GraphQL errors in response");

        return Err(ShopifyError::GraphQL(
            errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e.locations.map_or_else(Vec::new, |locs| {
                        locs.into_iter()
                            .map(|l| GraphQLErrorLocation {
                                line: i64::from(l.line),
                                column: i64::from(l.column),
                            })
                            .collect()
                    }),
                    path: e.path.map_or_else(Vec::new, |p| {
                        p.into_iter()
                            .map(|fragment| match fragment {
                                graphql_client::PathFragment::Key(s) => {
                                    serde_json::Value::String(s)
                                }
                                graphql_client::PathFragment::Index(i) => {
                                    serde_json::Value::Number(i.into())
                                }
                            })
                            .collect()
                    }),
                })
                .collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            operation,
            body = %excerpt(response_text, LOG_BODY_LIMIT),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL(vec![GraphQLError {
            message: "No data in response".to_string(),
            locations: vec![],
            path: vec![],
        }])
    })
}

fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_data() {
        let body = r#"{"data":{"customer":{"id":"gid://shopify/Customer/1","email":"ivy@example.com","firstName":"Ivy","lastName":null}}}"#;
        let data: get_customer::ResponseData = parse_response("GetCustomer", body).unwrap();
        let customer = convert_customer(data.customer.unwrap());
        assert_eq!(customer.email.as_deref(), Some("ivy@example.com"));
    }

    #[test]
    fn test_parse_response_graphql_errors() {
        let body = r#"{"data":null,"errors":[{"message":"Access denied","path":["customer"],"locations":[{"line":2,"column":3}]}]}"#;
        let err = parse_response::<get_customer::ResponseData>("GetCustomer", body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Access denied path: customer at line 2:3"
        );
    }

    #[test]
    fn test_parse_response_without_data() {
        let err = parse_response::<get_customer::ResponseData>("GetCustomer", "{}").unwrap_err();
        assert!(matches!(err, ShopifyError::GraphQL(_)));
    }

    #[test]
    fn test_parse_response_malformed_json() {
        let err = parse_response::<get_customer::ResponseData>("GetCustomer", "<html>").unwrap_err();
        assert!(matches!(err, ShopifyError::Parse(_)));
    }

    #[test]
    fn test_null_customer_is_none() {
        let body = r#"{"data":{"customer":null}}"#;
        let data: get_customer::ResponseData = parse_response("GetCustomer", body).unwrap();
        assert!(data.customer.is_none());
    }
}
