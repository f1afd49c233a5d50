//! Customer session store.
//!
//! Signing in exchanges credentials for a platform access token, records the
//! customer under [`keys::SESSION`], and merges the remote wishlist into the
//! local one. The stored session is checked for expiry on every read.

use chrono::{DateTime, Utc};
use fernhouse_core::CustomerSession;
use tracing::instrument;

use super::wishlist::{WishlistStore, WishlistSync};
use crate::shopify::{CommerceApi, LoginError};
use crate::storage::{LocalStorage, StorageError, keys};

/// A completed login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: CustomerSession,
    pub wishlist: WishlistSync,
}

/// Reads and writes the signed-in customer.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: LocalStorage> SessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Sign a customer in and merge their remote wishlist.
    ///
    /// The wishlist is synced exactly once per successful login. A failed
    /// wishlist save is logged; the customer is still signed in.
    ///
    /// # Errors
    ///
    /// Returns `LoginError` if the platform rejects the credentials, does not
    /// recognise the issued token, is unreachable, or if the session cannot
    /// be stored.
    #[instrument(skip(self, api, wishlist, password))]
    pub async fn login<W: LocalStorage>(
        &self,
        api: &impl CommerceApi,
        wishlist: &mut WishlistStore<W>,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, LoginError> {
        let email = email.trim();
        let token = api.login(email, password).await?;

        let customer = api
            .get_customer_data(&token.access_token)
            .await?
            .ok_or(LoginError::InvalidToken)?;

        let session = CustomerSession {
            name: customer.full_name(),
            email: customer.email.unwrap_or_else(|| email.to_string()),
            id: customer.id,
            access_token: token.access_token,
            expires_at: token.expires_at,
        };

        self.storage
            .save(
                keys::SESSION,
                serde_json::to_value(&session).map_err(StorageError::from)?,
            )
            .await?;

        let wishlist = match wishlist.sync_on_login(api, &session.access_token).await {
            Ok(sync) => sync,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save merged wishlist");
                WishlistSync::Skipped
            }
        };

        crate::error::set_sentry_user(&session.id, Some(&session.email));
        tracing::info!(customer_id = %session.id, "Customer signed in");

        Ok(LoginOutcome { session, wishlist })
    }

    /// The signed-in customer at `now`.
    ///
    /// Expired or unreadable sessions are removed and reported as signed out.
    pub async fn current(&self, now: DateTime<Utc>) -> Option<CustomerSession> {
        let value = match self.storage.load(keys::SESSION).await {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read customer session");
                return None;
            }
        };

        match serde_json::from_value::<CustomerSession>(value) {
            Ok(session) if !session.is_expired(now) => Some(session),
            Ok(session) => {
                tracing::debug!(customer_id = %session.id, "Customer session expired");
                self.discard().await;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable customer session");
                self.discard().await;
                None
            }
        }
    }

    /// Sign the customer out.
    ///
    /// The platform token is revoked on a best-effort basis; the local
    /// session is removed either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session could not be removed.
    #[instrument(skip(self, api))]
    pub async fn logout(&self, api: &impl CommerceApi) -> Result<(), StorageError> {
        if let Ok(Some(value)) = self.storage.load(keys::SESSION).await
            && let Ok(session) = serde_json::from_value::<CustomerSession>(value)
            && let Err(e) = api.delete_access_token(&session.access_token).await
        {
            tracing::warn!(error = %e, "Failed to revoke access token");
        }

        self.storage.remove(keys::SESSION).await?;
        crate::error::clear_sentry_user();
        Ok(())
    }

    async fn discard(&self) {
        if let Err(e) = self.storage.remove(keys::SESSION).await {
            tracing::warn!(error = %e, "Failed to remove customer session");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use fernhouse_core::CustomerId;

    use super::*;
    use crate::shopify::testing::{FakeCommerce, VALID_EMAIL, VALID_PASSWORD, VALID_TOKEN};
    use crate::storage::MemoryStorage;
    use crate::stores::wishlist::tests::saved;

    fn session_expiring(expires_at: DateTime<Utc>) -> CustomerSession {
        CustomerSession {
            id: CustomerId::new("gid://shopify/Customer/7"),
            email: VALID_EMAIL.to_string(),
            name: None,
            access_token: VALID_TOKEN.to_string(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_login_stores_session_and_syncs_once() {
        let api = FakeCommerce::default();
        *api.remote_wishlist.lock().unwrap() = vec![saved("monstera", 4500)];

        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(storage.clone());
        let mut wishlist = WishlistStore::load(storage.clone()).await;
        wishlist.add_to_wishlist(saved("fern", 1500)).await.unwrap();

        let outcome = sessions
            .login(&api, &mut wishlist, VALID_EMAIL, VALID_PASSWORD)
            .await
            .unwrap();

        assert_eq!(outcome.session.name.as_deref(), Some("Ivy Green"));
        assert_eq!(outcome.session.access_token, VALID_TOKEN);
        assert_eq!(outcome.wishlist, WishlistSync::Merged(2));
        assert_eq!(FakeCommerce::count(&api.wishlist_calls), 1);

        let stored = sessions.current(Utc::now()).await.unwrap();
        assert_eq!(stored, outcome.session);
    }

    #[tokio::test]
    async fn test_rejected_login_stores_nothing() {
        let api = FakeCommerce::default();
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(storage.clone());
        let mut wishlist = WishlistStore::load(storage).await;

        let err = sessions
            .login(&api, &mut wishlist, VALID_EMAIL, "wrong")
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Unidentified customer");
        assert!(sessions.current(Utc::now()).await.is_none());
        assert_eq!(FakeCommerce::count(&api.wishlist_calls), 0);
    }

    #[tokio::test]
    async fn test_empty_credentials() {
        let api = FakeCommerce::default();
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(storage.clone());
        let mut wishlist = WishlistStore::load(storage).await;

        let err = sessions
            .login(&api, &mut wishlist, "  ", "")
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let storage = MemoryStorage::new();
        let now = Utc::now();
        storage
            .save(
                keys::SESSION,
                serde_json::to_value(session_expiring(now - Duration::minutes(1))).unwrap(),
            )
            .await
            .unwrap();

        let sessions = SessionStore::new(storage.clone());
        assert!(sessions.current(now).await.is_none());
        assert_eq!(storage.load(keys::SESSION).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_revokes_and_removes() {
        let api = FakeCommerce::default();
        let storage = MemoryStorage::new();
        let now = Utc::now();
        storage
            .save(
                keys::SESSION,
                serde_json::to_value(session_expiring(now + Duration::days(1))).unwrap(),
            )
            .await
            .unwrap();

        let sessions = SessionStore::new(storage);
        assert!(sessions.current(now).await.is_some());

        sessions.logout(&api).await.unwrap();
        assert_eq!(FakeCommerce::count(&api.deleted_tokens), 1);
        assert!(sessions.current(now).await.is_none());
    }
}
