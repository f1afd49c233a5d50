//! Customer extractor.
//!
//! Reads the signed-in customer from the visitor's session, dropping it
//! once it has expired.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use fernhouse_core::CustomerSession;
use tower_sessions::Session;

use crate::stores::SessionStore;

/// Extractor that optionally gets the signed-in customer.
///
/// Never rejects; anonymous visitors get `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalCustomer(customer): OptionalCustomer,
/// ) -> impl IntoResponse {
///     match customer {
///         Some(c) => format!("Hello, {}!", c.greeting_name()),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalCustomer(pub Option<CustomerSession>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let customer = match parts.extensions.get::<Session>() {
            Some(session) => SessionStore::new(session.clone()).current(Utc::now()).await,
            None => None,
        };

        Ok(Self(customer))
    }
}
