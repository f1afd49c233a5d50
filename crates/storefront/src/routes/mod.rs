//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Pages (markdown)
//! GET  /about-us, /contact-us, /faq, /privacy-policy,
//!      /refund-policy, /shipping, /terms-service
//!
//! # Catalog
//! GET  /collections            - Collection listing
//! GET  /collections/{handle}   - Collection detail
//! GET  /search?q=              - Search results page
//! GET  /search/suggest?q=      - Instant search results (HTMX fragment)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add a line item
//! POST /cart/update            - Set a line quantity (0 or less removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! POST /checkout               - Create a checkout and redirect to it
//!
//! # Wishlist
//! GET  /wishlist               - Saved items
//! POST /wishlist/add           - Save an item
//! POST /wishlist/remove        - Remove an item
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action (rate limited)
//! POST /logout                 - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod collections;
pub mod home;
pub mod pages;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tower_sessions::Session;

use fernhouse_core::Price;

use crate::config::BrandConfig;
use crate::error::AppError;
use crate::middleware::{auth_rate_limiter, create_session_layer};
use crate::state::AppState;
use crate::stores::{CartStore, SessionStore, WishlistStore};

/// Layout data every full page needs: brand settings and header badges.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub brand: BrandConfig,
    pub customer_name: Option<String>,
    pub cart_count: u32,
    pub wishlist_count: usize,
}

impl PageContext {
    /// Build the layout for a visitor.
    pub async fn load(state: &AppState, session: Option<&Session>) -> Self {
        let brand = state.config().brand.clone();
        let Some(session) = session else {
            return Self {
                brand,
                customer_name: None,
                cart_count: 0,
                wishlist_count: 0,
            };
        };

        let customer = SessionStore::new(session.clone())
            .current(Utc::now())
            .await;
        let cart = CartStore::load(session.clone()).await;
        let wishlist = WishlistStore::load(session.clone()).await;

        Self {
            brand,
            customer_name: customer.map(|c| c.greeting_name().to_string()),
            cart_count: cart.item_count(),
            wishlist_count: wishlist.len(),
        }
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::load(state, parts.extensions.get::<Session>()).await)
    }
}

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Parse a posted unit price. Malformed or negative prices are rejected.
pub(crate) fn parse_price(raw: &str) -> Result<Price, AppError> {
    raw.trim()
        .parse::<Price>()
        .ok()
        .filter(|price| !price.is_negative())
        .ok_or_else(|| AppError::BadRequest("Invalid price".to_string()))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(pages::router())
        .nest("/collections", collection_routes())
        .route("/search", get(search::results))
        .route("/search/suggest", get(search::suggest))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .nest("/wishlist", wishlist_routes())
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// The storefront application with sessions and request tracing.
///
/// Static files and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .fallback(not_found)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> crate::error::AppError {
    crate::error::AppError::NotFound("route".to_string())
}
