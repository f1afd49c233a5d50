//! Authentication route handlers.
//!
//! Customers sign in with the email and password of their Shopify customer
//! account. A successful login stores the session and merges the remote
//! wishlist into the visitor's saved items.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::PageContext;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::shopify::LoginError;
use crate::state::AppState;
use crate::storage::StorageError;
use crate::stores::{SessionStore, WishlistStore};

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub error: Option<String>,
    pub email: String,
}

const fn login_status(error: &LoginError) -> StatusCode {
    match error {
        LoginError::MissingCredentials => StatusCode::BAD_REQUEST,
        LoginError::Rejected(_) | LoginError::InvalidToken => StatusCode::UNAUTHORIZED,
        LoginError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        LoginError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Display the login page. Signed-in customers go home.
pub async fn login_page(OptionalCustomer(customer): OptionalCustomer, ctx: PageContext) -> Response {
    if customer.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        ctx,
        error: None,
        email: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// Failures re-render the form with the message Shopify gave, or a
/// generic one when the platform could not be reached.
#[instrument(skip(state, session, ctx, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let mut wishlist = WishlistStore::load(session.clone()).await;

    let outcome = SessionStore::new(session.clone())
        .login(state.storefront(), &mut wishlist, &form.email, &form.password)
        .await;

    match outcome {
        Ok(outcome) => {
            session.cycle_id().await.map_err(StorageError::from)?;
            tracing::debug!(wishlist = ?outcome.wishlist, "Login complete");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let status = login_status(&e);
            if status.is_server_error() {
                tracing::error!(error = %e, "Login failed");
            } else {
                tracing::info!(error = %e, "Login rejected");
            }

            Ok((
                status,
                LoginTemplate {
                    ctx,
                    error: Some(e.user_message()),
                    email: form.email,
                },
            )
                .into_response())
        }
    }
}

/// Sign out and go home.
///
/// # Errors
///
/// Returns an error if the session could not be cleared.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    SessionStore::new(session.clone())
        .logout(state.storefront())
        .await?;
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Storage(e.into()))?;

    Ok(Redirect::to("/"))
}
