//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Uses the `graphql_client` query/response envelope for every operation
//! - Shopify is the source of truth for catalog, customers and checkout
//! - Collections are cached in memory via `moka` (5 minute TTL); search,
//!   login and customer calls are never cached
//! - Every call is a single attempt. Nothing is retried.
//!
//! # Seam
//!
//! Stores and the search bar talk to the platform through the
//! [`CommerceApi`] trait so they can be exercised without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use fernhouse_storefront::shopify::{CommerceApi, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! let token = client.login("ivy@example.com", "hunter22").await?;
//! let customer = client.get_customer_data(&token.access_token).await?;
//! let results = client.search_products("monstera", 6).await?;
//! ```

mod storefront;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use storefront::StorefrontClient;
pub use types::*;

use std::future::Future;

use fernhouse_core::WishlistItem;
use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but a field held an unusable value.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

/// Errors from the customer login flow.
///
/// Each variant maps to one of the ways the login form reports a failure:
/// platform-reported problems are shown verbatim, anything else becomes a
/// generic retry message.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Email or password was left empty.
    #[error("email and password are required")]
    MissingCredentials,

    /// The platform rejected the credentials.
    #[error("login rejected: {}", format_user_errors(.0))]
    Rejected(Vec<UserError>),

    /// The platform answered without a usable access token.
    #[error("no valid access token in login response")]
    InvalidToken,

    /// The platform could not be reached or answered unexpectedly.
    #[error("commerce platform unavailable: {0}")]
    Unavailable(#[from] ShopifyError),

    /// The session could not be written to local storage.
    #[error("session storage failed: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

impl LoginError {
    /// Message shown on the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => "Please enter your email and password.".to_string(),
            Self::Rejected(errors) if !errors.is_empty() => format_user_errors(errors),
            Self::Rejected(_) | Self::InvalidToken => {
                "Login failed. Please check your email and password.".to_string()
            }
            Self::Unavailable(_) | Self::Storage(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// The operations the storefront needs from the commerce platform.
///
/// Implemented by [`StorefrontClient`]; tests substitute an in-memory fake.
pub trait CommerceApi: Send + Sync {
    /// Exchange customer credentials for an access token.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AccessToken, LoginError>> + Send;

    /// Fetch the customer behind an access token (`None` if the platform
    /// does not recognise the token).
    fn get_customer_data(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Option<CustomerRecord>, ShopifyError>> + Send;

    /// Full-text product search.
    fn search_products(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ProductSummary>, ShopifyError>> + Send;

    /// The wishlist saved on the customer record.
    fn get_remote_wishlist(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<WishlistItem>, ShopifyError>> + Send;

    /// Create a platform cart from a snapshot and return its checkout URL.
    fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> impl Future<Output = Result<String, ShopifyError>> + Send;

    /// Revoke an access token.
    fn delete_access_token(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send;
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("collection succulents".to_string());
        assert_eq!(err.to_string(), "Not found: collection succulents");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: products.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_login_error_messages() {
        let rejected = LoginError::Rejected(vec![UserError {
            code: Some("UNIDENTIFIED_CUSTOMER".to_string()),
            field: vec!["input".to_string()],
            message: "Unidentified customer".to_string(),
        }]);
        assert_eq!(rejected.user_message(), "Unidentified customer");

        let unavailable = LoginError::Unavailable(ShopifyError::RateLimited(3));
        assert_eq!(
            unavailable.user_message(),
            "Something went wrong. Please try again."
        );

        assert_eq!(
            LoginError::InvalidToken.user_message(),
            "Login failed. Please check your email and password."
        );
    }
}
