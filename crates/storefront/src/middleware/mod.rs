//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with an in-memory store)
//! 4. Rate limiting on the login form (governor)

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::OptionalCustomer;
pub use rate_limit::auth_rate_limiter;
pub use session::create_session_layer;
