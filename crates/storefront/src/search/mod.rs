//! Instant product search.
//!
//! [`SearchBar`] is the state machine behind the header search box:
//!
//! ```text
//! Idle -> Debouncing -> Querying -> Results | Empty | Error
//!   ^                                  |
//!   +------ clear() / dismiss() -------+
//! ```
//!
//! Time is passed in by the caller, so the machine never sleeps and can be
//! driven deterministically. Each issued request carries a sequence number;
//! a response is applied only if it belongs to the most recent request, so
//! a slow answer to an older query never replaces newer results.

use std::time::{Duration, Instant};

use tracing::instrument;

use crate::shopify::{CommerceApi, ProductSummary, ShopifyError};

/// Quiet period after the last keystroke before a query is sent.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this (after trimming) are never sent.
pub const MIN_QUERY_CHARS: usize = 2;

/// Number of products shown in the dropdown.
pub const RESULT_LIMIT: u32 = 6;

const SEARCH_FAILED: &str = "Something went wrong. Please try again.";

/// Trim a raw query. `None` if it is too short to search for.
#[must_use]
pub fn normalize_query(text: &str) -> Option<String> {
    let query = text.trim();
    (query.chars().count() >= MIN_QUERY_CHARS).then(|| query.to_string())
}

/// Where the search box currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Debouncing { query: String, since: Instant },
    Querying { query: String, seq: u64 },
    Results { query: String, products: Vec<ProductSummary> },
    Empty { query: String },
    Error { query: String, message: String },
}

impl SearchState {
    /// The query this state belongs to.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Debouncing { query, .. }
            | Self::Querying { query, .. }
            | Self::Results { query, .. }
            | Self::Empty { query }
            | Self::Error { query, .. } => Some(query),
        }
    }
}

/// A search the caller should send to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// Debounced search box state.
#[derive(Debug, Clone)]
pub struct SearchBar {
    state: SearchState,
    last_seq: u64,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBar {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SearchState::Idle,
            last_seq: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    /// Products currently shown in the dropdown.
    #[must_use]
    pub fn results(&self) -> &[ProductSummary] {
        match &self.state {
            SearchState::Results { products, .. } => products,
            _ => &[],
        }
    }

    /// Whether the dropdown is showing an outcome.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(
            self.state,
            SearchState::Results { .. } | SearchState::Empty { .. } | SearchState::Error { .. }
        )
    }

    /// When the pending query becomes due, if one is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            SearchState::Debouncing { since, .. } => Some(*since + DEBOUNCE),
            _ => None,
        }
    }

    /// Handle a change to the search box text.
    ///
    /// Short queries return the box to idle. Anything else restarts the
    /// debounce and abandons an in-flight request.
    pub fn input(&mut self, text: &str, now: Instant) {
        let Some(query) = normalize_query(text) else {
            self.state = SearchState::Idle;
            return;
        };

        if self.state.query() == Some(query.as_str())
            && !matches!(self.state, SearchState::Error { .. })
        {
            return;
        }

        self.state = SearchState::Debouncing { query, since: now };
    }

    /// Issue the pending query once its debounce has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let SearchState::Debouncing { query, since } = &self.state else {
            return None;
        };
        if now.saturating_duration_since(*since) < DEBOUNCE {
            return None;
        }

        self.last_seq += 1;
        let request = SearchRequest {
            seq: self.last_seq,
            query: query.clone(),
        };
        self.state = SearchState::Querying {
            query: request.query.clone(),
            seq: request.seq,
        };
        Some(request)
    }

    /// Apply the response to request `seq`.
    ///
    /// Returns `false` and changes nothing if the response is stale.
    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<Vec<ProductSummary>, ShopifyError>,
    ) -> bool {
        let SearchState::Querying {
            query,
            seq: current,
        } = &self.state
        else {
            tracing::debug!(seq, "Dropping search response, no query in flight");
            return false;
        };
        if *current != seq {
            tracing::debug!(seq, current, "Dropping stale search response");
            return false;
        }

        let query = query.clone();
        self.state = match result {
            Ok(products) if products.is_empty() => SearchState::Empty { query },
            Ok(products) => SearchState::Results { query, products },
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "Product search failed");
                SearchState::Error {
                    query,
                    message: SEARCH_FAILED.to_string(),
                }
            }
        };
        true
    }

    /// The search box was emptied.
    pub fn clear(&mut self) {
        self.state = SearchState::Idle;
    }

    /// The visitor clicked outside the search box.
    pub fn dismiss(&mut self) {
        self.state = SearchState::Idle;
    }

    /// Send the pending query if it is due and apply the response.
    ///
    /// Returns whether the response was applied.
    #[instrument(skip(self, api))]
    pub async fn run_due(&mut self, api: &impl CommerceApi, now: Instant) -> bool {
        let Some(request) = self.poll(now) else {
            return false;
        };
        let result = api.search_products(&request.query, RESULT_LIMIT).await;
        self.complete(request.seq, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::testing::FakeCommerce;

    fn titles(bar: &SearchBar) -> Vec<&str> {
        bar.results().iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  "), None);
        assert_eq!(normalize_query(" a "), None);
        assert_eq!(normalize_query(" ab "), Some("ab".to_string()));
        assert_eq!(normalize_query("é"), None);
    }

    #[tokio::test]
    async fn test_short_query_never_calls_api() {
        let api = FakeCommerce::with_catalog(&["Aloe Vera"]);
        let mut bar = SearchBar::new();
        let start = Instant::now();

        for text in ["", "a", " a ", "A"] {
            bar.input(text, start);
            assert!(!bar.run_due(&api, start + Duration::from_secs(5)).await);
            assert_eq!(bar.state(), &SearchState::Idle);
        }
        assert_eq!(FakeCommerce::count(&api.search_calls), 0);
    }

    #[tokio::test]
    async fn test_waits_for_debounce() {
        let api = FakeCommerce::with_catalog(&["Monstera Deliciosa", "Mini Monstera"]);
        let mut bar = SearchBar::new();
        let start = Instant::now();

        bar.input("mon", start);
        bar.input("monstera", start + Duration::from_millis(200));
        assert_eq!(
            bar.deadline(),
            Some(start + Duration::from_millis(200) + DEBOUNCE)
        );

        assert!(!bar.run_due(&api, start + Duration::from_millis(400)).await);
        assert_eq!(FakeCommerce::count(&api.search_calls), 0);

        assert!(bar.run_due(&api, start + Duration::from_millis(500)).await);
        assert_eq!(FakeCommerce::count(&api.search_calls), 1);
        assert_eq!(titles(&bar), vec!["Monstera Deliciosa", "Mini Monstera"]);
        assert!(bar.is_open());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let catalog = FakeCommerce::with_catalog(&["Succulent Trio", "Succulents Sampler"]);
        let mut bar = SearchBar::new();
        let start = Instant::now();

        bar.input("succulent", start);
        let first = bar.poll(start + DEBOUNCE).unwrap();

        bar.input("succulents", start + Duration::from_millis(350));
        let second = bar.poll(start + Duration::from_millis(650)).unwrap();
        assert!(second.seq > first.seq);

        let later = vec![catalog.catalog[1].clone()];
        let earlier = catalog.catalog.clone();

        assert!(bar.complete(second.seq, Ok(later)));
        assert!(!bar.complete(first.seq, Ok(earlier)));

        assert_eq!(titles(&bar), vec!["Succulents Sampler"]);
        assert_eq!(bar.state().query(), Some("succulents"));
    }

    #[test]
    fn test_response_after_new_input_is_dropped() {
        let mut bar = SearchBar::new();
        let start = Instant::now();

        bar.input("fern", start);
        let request = bar.poll(start + DEBOUNCE).unwrap();
        bar.input("ferns", start + Duration::from_millis(320));

        assert!(!bar.complete(request.seq, Ok(Vec::new())));
        assert!(matches!(bar.state(), SearchState::Debouncing { .. }));
    }

    #[tokio::test]
    async fn test_empty_and_error_outcomes() {
        let mut bar = SearchBar::new();
        let start = Instant::now();

        let api = FakeCommerce::with_catalog(&["Snake Plant"]);
        bar.input("cactus", start);
        assert!(bar.run_due(&api, start + DEBOUNCE).await);
        assert_eq!(
            bar.state(),
            &SearchState::Empty {
                query: "cactus".to_string()
            }
        );

        let down = FakeCommerce {
            search_unavailable: true,
            ..FakeCommerce::default()
        };
        bar.input("snake", start + Duration::from_secs(1));
        assert!(bar.run_due(&down, start + Duration::from_secs(2)).await);
        assert!(matches!(
            bar.state(),
            SearchState::Error { message, .. } if message == SEARCH_FAILED
        ));
    }

    #[tokio::test]
    async fn test_clear_and_dismiss_reset_to_idle() {
        let api = FakeCommerce::with_catalog(&["Pothos"]);
        let mut bar = SearchBar::new();
        let start = Instant::now();

        bar.input("pothos", start);
        assert!(bar.run_due(&api, start + DEBOUNCE).await);
        bar.dismiss();
        assert_eq!(bar.state(), &SearchState::Idle);
        assert!(bar.results().is_empty());

        bar.input("pothos", start + Duration::from_secs(1));
        let request = bar.poll(start + Duration::from_secs(2)).unwrap();
        bar.clear();
        assert!(!bar.complete(request.seq, Ok(Vec::new())));
        assert_eq!(bar.state(), &SearchState::Idle);
    }
}
