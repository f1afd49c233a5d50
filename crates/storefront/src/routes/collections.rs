//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use super::PageContext;
use crate::error::{AppError, Result};
use crate::filters;
use crate::shopify::{CollectionDetail, CollectionSummary, ShopifyError};
use crate::state::AppState;

/// Collections shown on the listing page.
const COLLECTIONS_LIMIT: u32 = 50;

/// Products shown on a collection page.
const PRODUCTS_LIMIT: u32 = 48;

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub ctx: PageContext,
    pub collections: Vec<CollectionSummary>,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub ctx: PageContext,
    pub detail: CollectionDetail,
}

/// Display all collections.
///
/// # Errors
///
/// Returns an error if Shopify cannot be reached.
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<CollectionsIndexTemplate> {
    let collections = state.storefront().get_collections(COLLECTIONS_LIMIT).await?;
    Ok(CollectionsIndexTemplate { ctx, collections })
}

/// Display a collection and its products.
///
/// # Errors
///
/// Returns 404 for an unknown handle, or an error if Shopify cannot be reached.
#[instrument(skip(state, ctx), fields(handle = %handle))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    ctx: PageContext,
) -> Result<CollectionShowTemplate> {
    let detail = state
        .storefront()
        .get_collection_products(&handle, PRODUCTS_LIMIT)
        .await
        .map_err(|e| match e {
            ShopifyError::NotFound(_) => AppError::NotFound(format!("collection {handle}")),
            other => AppError::Shopify(other),
        })?;

    Ok(CollectionShowTemplate { ctx, detail })
}
