//! Customer session records.

use core::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// Seconds before the platform's expiry at which a session is treated as
/// expired, so a token is never sent in its final moments.
const EXPIRY_LEEWAY_SECONDS: i64 = 60;

/// The signed-in customer.
///
/// Created on successful login and persisted in local storage. `Debug`
/// redacts the access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSession {
    /// Customer ID on the commerce platform.
    pub id: CustomerId,
    /// Customer email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Platform access token for customer-scoped calls.
    pub access_token: String,
    /// When the platform stops accepting the token.
    pub expires_at: DateTime<Utc>,
}

impl CustomerSession {
    /// Whether the session must no longer be used at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at - Duration::seconds(EXPIRY_LEEWAY_SECONDS)
    }

    /// Name to greet the customer with, falling back to their email.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

impl fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerSession")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
