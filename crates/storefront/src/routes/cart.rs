//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Forms post here and are
//! redirected back to `/cart`; HTMX requests get the header badge fragment
//! and a `cart-updated` trigger instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use fernhouse_core::{CartLineItem, ItemId, Price, VariantId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{PageContext, is_htmx, parse_price};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::stores::{CartError, CartStore};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    #[serde(default)]
    pub variant_id: String,
    #[serde(default)]
    pub handle: String,
    pub name: String,
    pub price: String,
    pub quantity: Option<u32>,
    pub image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl AddToCartForm {
    fn into_line_item(self) -> Result<CartLineItem> {
        let price = parse_price(&self.price)?;

        Ok(CartLineItem {
            id: ItemId::new(self.id),
            variant_id: VariantId::new(self.variant_id),
            handle: self.handle,
            name: self.name,
            price,
            quantity: self.quantity.unwrap_or(1),
            image: self.image.filter(|s| !s.is_empty()),
            size: self.size.filter(|s| !s.is_empty()),
            color: self.color.filter(|s| !s.is_empty()),
        })
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub lines: Vec<CartLineItem>,
    pub total: Price,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Redirect forms back to the cart; answer HTMX with the new badge.
fn updated(headers: &HeaderMap, cart: &CartStore<Session>) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

/// Display cart page.
#[instrument(skip(session, ctx))]
pub async fn show(session: Session, ctx: PageContext) -> CartShowTemplate {
    let cart = CartStore::load(session).await;

    CartShowTemplate {
        ctx,
        total: cart.total_price(),
        lines: cart.lines().to_vec(),
    }
}

/// Add item to cart.
///
/// # Errors
///
/// Returns 400 if the id or variant is missing, the quantity is zero or
/// the price is malformed or negative.
#[instrument(skip(session, headers, form), fields(item_id = %form.id))]
pub async fn add(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = form.into_line_item()?;
    let mut cart = CartStore::load(session).await;

    add_breadcrumb("cart", "Added to cart", Some(&[("item_id", item.id.as_str())][..]));
    cart.add_to_cart(item).await?;

    Ok(updated(&headers, &cart))
}

/// Update cart item quantity. Zero or less removes the line.
///
/// # Errors
///
/// Returns an error if the cart could not be saved.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = CartStore::load(session).await;
    cart.update_quantity(&ItemId::new(form.id), form.quantity)
        .await?;

    Ok(updated(&headers, &cart))
}

/// Remove item from cart.
///
/// # Errors
///
/// Returns an error if the cart could not be saved.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = CartStore::load(session).await;
    cart.remove_from_cart(&ItemId::new(form.id)).await?;

    Ok(updated(&headers, &cart))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart could not be saved.
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let mut cart = CartStore::load(session).await;
    cart.clear().await?;

    Ok(updated(&headers, &cart))
}

/// Create a Shopify checkout for the cart and redirect to it.
///
/// An empty cart redirects back to the cart page.
///
/// # Errors
///
/// Returns an error if Shopify cannot create the checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut cart = CartStore::load(session).await;

    match cart.checkout(state.storefront()).await {
        Ok(url) => {
            tracing::info!("Redirecting to checkout");
            Ok(Redirect::to(&url))
        }
        Err(CartError::Empty) => Ok(Redirect::to("/cart")),
        Err(e) => Err(e.into()),
    }
}
