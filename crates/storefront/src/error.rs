//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fernhouse_core::LineItemError;
use thiserror::Error;

use crate::content::ContentError;
use crate::shopify::ShopifyError;
use crate::storage::StorageError;
use crate::stores::CartError;

/// Message shown for any failure the visitor cannot fix.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Visitor storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Page content could not be loaded.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<LineItemError> for AppError {
    fn from(err: LineItemError) -> Self {
        Self::Cart(CartError::Invalid(err))
    }
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Shopify(_) | Self::Storage(_) | Self::Content(_) => true,
            Self::Cart(err) => matches!(err, CartError::Storage(_) | CartError::Checkout(_)),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) | Self::Content(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(ShopifyError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Shopify(ShopifyError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Cart(err) => match err {
                CartError::Invalid(_) | CartError::Empty => StatusCode::BAD_REQUEST,
                CartError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CartError::Checkout(_) => StatusCode::BAD_GATEWAY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the visitor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(CartError::Invalid(err)) => capitalize(&err.to_string()),
            Self::Cart(CartError::Empty) => "Your cart is empty.".to_string(),
            Self::NotFound(_) | Self::Shopify(ShopifyError::NotFound(_)) => {
                "Page not found".to_string()
            }
            Self::BadRequest(msg) => msg.clone(),
            Self::Shopify(ShopifyError::RateLimited(_)) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), self.user_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect::<String>() + "."
    })
}

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful authentication to associate errors with customers.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for visitor actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("item_id", "gid://shopify/Product/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("collection succulents".to_string());
        assert_eq!(err.to_string(), "Not found: collection succulents");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::RateLimited(2))),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::InvalidData("x".to_string()))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_missing_variant_is_a_blocking_alert() {
        let err = AppError::from(LineItemError::MissingVariant);
        assert_eq!(
            err.user_message(),
            "Please select a size or option before adding to cart."
        );
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Shopify(ShopifyError::InvalidData("missing cart id".to_string()));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }
}
