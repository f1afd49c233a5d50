//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use fernhouse_core::{ItemId, VariantId, WishlistItem};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{PageContext, is_htmx, parse_price};
use crate::error::{AppError, Result};
use crate::filters;
use crate::stores::WishlistStore;

/// Save item form data.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistForm {
    pub id: String,
    pub handle: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub variant_id: Option<String>,
}

impl AddToWishlistForm {
    fn into_item(self) -> Result<WishlistItem> {
        if self.id.trim().is_empty() {
            return Err(AppError::BadRequest("Missing item id".to_string()));
        }
        let price = parse_price(&self.price)?;

        Ok(WishlistItem {
            id: ItemId::new(self.id),
            handle: self.handle,
            name: self.name,
            price,
            image: self.image.filter(|s| !s.is_empty()),
            variant_id: self
                .variant_id
                .filter(|s| !s.trim().is_empty())
                .map(VariantId::new),
            variant_options: Vec::new(),
        })
    }
}

/// Remove item form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromWishlistForm {
    pub id: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub ctx: PageContext,
    pub items: Vec<WishlistItem>,
}

/// Heart toggle fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_toggle.html")]
pub struct WishlistToggleTemplate {
    pub item: WishlistItem,
    pub saved: bool,
}

/// Display the wishlist.
#[instrument(skip(session, ctx))]
pub async fn show(session: Session, ctx: PageContext) -> WishlistShowTemplate {
    let wishlist = WishlistStore::load(session).await;

    WishlistShowTemplate {
        ctx,
        items: wishlist.items().to_vec(),
    }
}

/// Save an item. Saving an item twice keeps one copy.
///
/// # Errors
///
/// Returns 400 for a missing id or a malformed price, or an error if the
/// wishlist could not be saved.
#[instrument(skip(session, headers, form), fields(item_id = %form.id))]
pub async fn add(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToWishlistForm>,
) -> Result<Response> {
    let item = form.into_item()?;
    let mut wishlist = WishlistStore::load(session).await;
    wishlist.add_to_wishlist(item.clone()).await?;

    if is_htmx(&headers) {
        return Ok((
            AppendHeaders([("HX-Trigger", "wishlist-updated")]),
            WishlistToggleTemplate { item, saved: true },
        )
            .into_response());
    }
    Ok(Redirect::to("/wishlist").into_response())
}

/// Remove an item.
///
/// # Errors
///
/// Returns an error if the wishlist could not be saved.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromWishlistForm>,
) -> Result<Response> {
    let mut wishlist = WishlistStore::load(session).await;
    wishlist
        .remove_from_wishlist(&ItemId::new(form.id))
        .await?;

    if is_htmx(&headers) {
        return Ok(AppendHeaders([("HX-Trigger", "wishlist-updated")]).into_response());
    }
    Ok(Redirect::to("/wishlist").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::routes::tests::{body_text, get, post_form, session_cookie, test_app};

    const FERN: &str = "id=p-fern&handle=boston-fern&name=Boston+Fern&price=22.50";

    #[tokio::test]
    async fn test_add_twice_then_remove() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_form("/wishlist/add", FERN, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&response).unwrap();

        app.clone()
            .oneshot(post_form("/wishlist/add", FERN, Some(&cookie)))
            .await
            .unwrap();

        let body = body_text(
            app.clone()
                .oneshot(get("/wishlist", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body.matches("Boston Fern</h2>").count(), 1);
        assert!(body.contains("$22.50"));

        app.clone()
            .oneshot(post_form("/wishlist/remove", "id=p-fern", Some(&cookie)))
            .await
            .unwrap();
        let body = body_text(app.oneshot(get("/wishlist", Some(&cookie))).await.unwrap()).await;
        assert!(!body.contains("Boston Fern</h2>"));
    }

    #[tokio::test]
    async fn test_bad_price_is_rejected() {
        let response = test_app()
            .oneshot(post_form(
                "/wishlist/add",
                "id=p-fern&handle=boston-fern&name=Boston+Fern&price=cheap",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_id_or_negative_price_is_rejected() {
        for form in [
            "id=&handle=boston-fern&name=Boston+Fern&price=22.50",
            "id=p-fern&handle=boston-fern&name=Boston+Fern&price=-22.50",
        ] {
            let response = test_app()
                .oneshot(post_form("/wishlist/add", form, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
        }
    }
}
