//! Request/response state for ticker searches.
//!
//! Every search gets a sequence number. A response is applied only if it
//! belongs to the latest search, so a slow reply for an old ticker can never
//! overwrite the page for a newer one.

use metrics_core::{Metrics, MetricsError};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading {
        seq: u64,
        ticker: String,
    },
    Succeeded {
        seq: u64,
        metrics: Arc<Metrics>,
    },
    Failed {
        seq: u64,
        ticker: String,
        message: String,
        status: Option<u16>,
    },
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            SearchState::Succeeded { metrics, .. } => Some(metrics),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn seq(&self) -> Option<u64> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { seq, .. }
            | SearchState::Succeeded { seq, .. }
            | SearchState::Failed { seq, .. } => Some(*seq),
        }
    }
}

/// Handed out by [`SearchSession::begin`] and given back with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    seq: u64,
    ticker: String,
}

impl RequestToken {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

#[derive(Debug)]
pub struct SearchSession {
    state: SearchState,
    latest: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            state: SearchState::Idle,
            latest: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.seq == self.latest
    }

    /// Starts a search. Whatever was shown before is replaced by the loading state.
    pub fn begin(&mut self, ticker: &str) -> RequestToken {
        self.latest += 1;
        let ticker = ticker.trim().to_string();
        self.state = SearchState::Loading {
            seq: self.latest,
            ticker: ticker.clone(),
        };
        RequestToken {
            seq: self.latest,
            ticker,
        }
    }

    /// Applies a response. Returns `false` and leaves the state alone when the
    /// token belongs to a superseded search.
    ///
    /// A failure clears whatever record was displayed before.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<Metrics, MetricsError>,
    ) -> bool {
        if !self.is_current(&token) {
            tracing::warn!(
                ticker = %token.ticker,
                seq = token.seq,
                latest = self.latest,
                "Dropping stale metrics response"
            );
            return false;
        }

        self.state = match result {
            Ok(metrics) => SearchState::Succeeded {
                seq: token.seq,
                metrics: Arc::new(metrics),
            },
            Err(e) => {
                tracing::warn!(ticker = %token.ticker, error = %e, "Metrics search failed");
                SearchState::Failed {
                    seq: token.seq,
                    status: e.status(),
                    message: e.to_string(),
                    ticker: token.ticker,
                }
            }
        };
        true
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
