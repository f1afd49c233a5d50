//! Static content page route handlers.
//!
//! Serves the markdown pages linked from the footer. The request path is
//! the page slug.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{MatchedPath, State},
    routing::get,
};
use chrono::NaiveDate;
use tracing::instrument;

use super::PageContext;
use crate::content::PAGE_SLUGS;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Serve the content page matching the request path.
///
/// # Errors
///
/// Returns 404 if the page has no content file.
#[instrument(skip(state, ctx), fields(path = %path.as_str()))]
pub async fn show(
    State(state): State<AppState>,
    path: MatchedPath,
    ctx: PageContext,
) -> Result<ContentPageTemplate> {
    let slug = path.as_str().trim_start_matches('/');
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        ctx,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    PAGE_SLUGS.iter().fold(Router::new(), |router, slug| {
        router.route(&format!("/{slug}"), get(show))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::routes::tests::{body_text, get, test_app};

    #[tokio::test]
    async fn test_every_footer_page_renders() {
        for slug in crate::content::PAGE_SLUGS {
            let response = test_app()
                .oneshot(get(&format!("/{slug}"), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "/{slug}");
        }
    }

    #[tokio::test]
    async fn test_page_body_is_rendered_markdown() {
        let response = test_app().oneshot(get("/faq", None)).await.unwrap();
        let body = body_text(response).await;
        assert!(body.contains("Frequently Asked Questions"));
        assert!(body.contains("<strong>bright, indirect light</strong>"));
    }
}
