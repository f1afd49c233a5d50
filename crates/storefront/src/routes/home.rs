//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use super::PageContext;
use crate::filters;
use crate::shopify::CollectionSummary;
use crate::state::AppState;

/// Collections featured on the home page.
const FEATURED_COLLECTIONS: u32 = 6;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub collections: Vec<CollectionSummary>,
}

/// Display the home page.
///
/// The page still renders without collections if Shopify is unavailable.
#[instrument(skip(state, ctx))]
pub async fn home(State(state): State<AppState>, ctx: PageContext) -> HomeTemplate {
    let collections = state
        .storefront()
        .get_collections(FEATURED_COLLECTIONS)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to fetch featured collections");
            Vec::new()
        });

    HomeTemplate { ctx, collections }
}
