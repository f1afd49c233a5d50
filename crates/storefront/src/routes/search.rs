//! Search route handlers.
//!
//! The header search box asks for suggestions as the visitor types. The
//! box itself debounces and cancels superseded requests (`hx-sync`); each
//! request is answered by running a [`SearchBar`] to its outcome.
//!
//! Submitting the box, or following a suggestion, opens the full results
//! page at `/search?q=`.

use std::time::Instant;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use super::PageContext;
use crate::filters;
use crate::search::{DEBOUNCE, SearchBar, SearchState};
use crate::shopify::ProductSummary;
use crate::state::AppState;

/// Search suggestions query parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// Search suggestions template (HTMX fragment).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub open: bool,
    pub query: String,
    pub products: Vec<ProductSummary>,
    pub error: Option<String>,
}

impl SearchResultsTemplate {
    fn from_state(state: &SearchState) -> Self {
        let (products, error) = match state {
            SearchState::Results { products, .. } => (products.clone(), None),
            SearchState::Error { message, .. } => (Vec::new(), Some(message.clone())),
            _ => (Vec::new(), None),
        };

        Self {
            open: matches!(
                state,
                SearchState::Results { .. } | SearchState::Empty { .. } | SearchState::Error { .. }
            ),
            query: state.query().unwrap_or_default().to_string(),
            products,
            error,
        }
    }
}

/// Full search results page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/show.html")]
pub struct SearchPageTemplate {
    pub ctx: PageContext,
    pub query: String,
    pub searched: bool,
    pub products: Vec<ProductSummary>,
    pub error: Option<String>,
}

async fn run_search(state: &AppState, q: &str) -> SearchResultsTemplate {
    let now = Instant::now();
    let mut bar = SearchBar::new();
    bar.input(q, now);
    bar.run_due(state.storefront(), now + DEBOUNCE).await;

    SearchResultsTemplate::from_state(bar.state())
}

/// Search suggestions endpoint (HTMX).
///
/// The box has already waited out the debounce before sending, so the
/// query is issued immediately. Queries shorter than two characters close
/// the dropdown without asking Shopify.
#[instrument(skip(state, query), fields(q = %query.q))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> SearchResultsTemplate {
    run_search(&state, &query.q).await
}

/// Search results page.
///
/// Uses the same rules as the suggestions: short queries show a prompt
/// and never reach Shopify.
#[instrument(skip(state, ctx, query), fields(q = %query.q))]
pub async fn results(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<SuggestQuery>,
) -> SearchPageTemplate {
    let found = run_search(&state, &query.q).await;

    SearchPageTemplate {
        ctx,
        query: query.q.trim().to_string(),
        searched: found.open,
        products: found.products,
        error: found.error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use fernhouse_core::ItemId;

    use super::*;
    use crate::routes::tests::{body_text, get, test_app};

    #[tokio::test]
    async fn test_short_query_returns_empty_fragment() {
        let response = test_app()
            .oneshot(get("/search/suggest?q=a", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains("search-result"));
    }

    #[test]
    fn test_fragment_from_state() {
        let empty = SearchResultsTemplate::from_state(&SearchState::Empty {
            query: "cactus".to_string(),
        });
        assert!(empty.open);
        assert_eq!(empty.query, "cactus");
        assert!(empty.products.is_empty());

        let failed = SearchResultsTemplate::from_state(&SearchState::Error {
            query: "cactus".to_string(),
            message: "Something went wrong. Please try again.".to_string(),
        });
        assert!(failed.error.is_some());

        assert!(!SearchResultsTemplate::from_state(&SearchState::Idle).open);
    }

    #[test]
    fn test_suggestions_link_to_results_page() {
        let html = SearchResultsTemplate {
            open: true,
            query: "snake plant".to_string(),
            products: vec![ProductSummary {
                id: ItemId::new("p-snake"),
                handle: "snake-plant".to_string(),
                title: "Snake Plant".to_string(),
                price: "24.00".parse().unwrap(),
                image: None,
                default_variant_id: None,
                available_for_sale: true,
            }],
            error: None,
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"href="/search?q=snake+plant#product-snake-plant""#));
        assert!(html.contains(r#"href="/search?q=snake+plant""#));
    }

    #[tokio::test]
    async fn test_results_page_prompts_for_short_query() {
        let response = test_app()
            .oneshot(get("/search?q=a", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("at least two characters"));
    }

    #[tokio::test]
    async fn test_search_box_submits_to_results_page() {
        let response = test_app().oneshot(get("/login", None)).await.unwrap();
        let body = body_text(response).await;
        assert!(body.contains(r#"action="/search""#));
        assert!(body.contains(r#"name="q""#));
    }

    #[tokio::test]
    async fn test_missing_query_is_accepted() {
        let response = test_app()
            .oneshot(get("/search/suggest", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
