pub mod state;
pub mod view;

pub use state::{RequestToken, SearchSession, SearchState};

use metrics_core::{Metrics, MetricsError, MetricsSource};
use narrative::NarrativeEngine;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Ties a metrics source to the search state machine and the views.
pub struct Dashboard<S: MetricsSource> {
    source: Arc<S>,
    session: Mutex<SearchSession>,
    engine: NarrativeEngine,
}

impl<S: MetricsSource> Dashboard<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            session: Mutex::new(SearchSession::new()),
            engine: NarrativeEngine::new(),
        }
    }

    /// Runs one search to completion and returns the state afterwards. If a
    /// newer search started in the meantime its state is returned instead.
    pub async fn search(&self, ticker: &str) -> SearchState {
        let token = self.session.lock().await.begin(ticker);
        tracing::info!(ticker = token.ticker(), seq = token.seq(), "Searching");

        let result = self.source.fetch_metrics(token.ticker()).await;

        let mut session = self.session.lock().await;
        session.complete(token, result);
        session.state().clone()
    }

    pub async fn state(&self) -> SearchState {
        self.session.lock().await.state().clone()
    }

    pub async fn render(&self) -> String {
        view::render_state(&self.state().await, &self.engine)
    }

    pub async fn load_screener(&self) -> Result<Vec<Metrics>, MetricsError> {
        let all = self.source.fetch_all_metrics().await?;
        tracing::info!(companies = all.len(), "Screener loaded");
        Ok(all)
    }

    pub fn engine(&self) -> &NarrativeEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use metrics_client::{ClientConfig, MetricsClient};
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    type Reply = Result<Metrics, MetricsError>;

    /// Source whose replies are released by the test, one ticker at a time
    #[derive(Default)]
    struct GatedSource {
        gates: std::sync::Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    }

    impl GatedSource {
        fn gate(&self, ticker: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(ticker.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl MetricsSource for GatedSource {
        async fn fetch_metrics(&self, ticker: &str) -> Result<Metrics, MetricsError> {
            let rx = self.gates.lock().unwrap().remove(ticker);
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(MetricsError::source("gate dropped"))),
                None => Err(MetricsError::source("no gate")),
            }
        }

        async fn fetch_all_metrics(&self) -> Result<Vec<Metrics>, MetricsError> {
            Ok(vec![Metrics::new("aapl"), Metrics::new("msft")])
        }
    }

    async fn wait_for_loading<S: MetricsSource>(dashboard: &Dashboard<S>, ticker: &str) {
        loop {
            if let SearchState::Loading { ticker: t, .. } = dashboard.state().await {
                if t == ticker {
                    return;
                }
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_late_response_for_old_search_is_ignored() {
        let source = Arc::new(GatedSource::default());
        let release_aapl = source.gate("aapl");
        let release_msft = source.gate("msft");
        let dashboard = Arc::new(Dashboard::new(source));

        let first = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.search("aapl").await }
        });
        wait_for_loading(&dashboard, "aapl").await;

        let second = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.search("msft").await }
        });
        wait_for_loading(&dashboard, "msft").await;

        release_msft.send(Ok(Metrics::new("msft"))).unwrap();
        let after_second = second.await.unwrap();
        assert_eq!(after_second.metrics().map(|m| m.ticker.as_str()), Some("msft"));

        release_aapl.send(Ok(Metrics::new("aapl"))).unwrap();
        first.await.unwrap();

        let state = dashboard.state().await;
        assert_eq!(state.metrics().map(|m| m.ticker.as_str()), Some("msft"));
        assert_eq!(state.seq(), Some(2));
    }

    #[tokio::test]
    async fn test_screener_passes_through() {
        let dashboard = Dashboard::new(Arc::new(GatedSource::default()));
        let all = dashboard.load_screener().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_http_500_ends_in_failed_state() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/aapl");
                then.status(200).json_body(json!({
                    "ticker": "aapl",
                    "companyName": "Apple Inc.",
                    "exchange": "US",
                    "latestPrice": 187.4
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/nvda");
                then.status(500).body("scraper failed");
            })
            .await;

        let client = MetricsClient::new(ClientConfig::new(server.base_url())).unwrap();
        let dashboard = Dashboard::new(Arc::new(client));

        let ok = dashboard.search("AAPL").await;
        assert!(ok.metrics().is_some());
        assert!(dashboard.render().await.contains("$187.40"));

        let failed = dashboard.search("NVDA").await;
        assert!(!failed.is_loading());
        assert!(failed.metrics().is_none());
        let message = failed.error().unwrap();
        assert!(message.starts_with("There was an error retrieving data."));
        assert!(message.contains("Status: 500, Message: scraper failed"));
        assert!(matches!(failed, SearchState::Failed { status: Some(500), .. }));

        let page = dashboard.render().await;
        assert!(page.contains("scraper failed"));
        assert!(!page.contains("Apple Inc."));
    }

    #[tokio::test]
    async fn test_empty_ticker_fails_without_loading() {
        let client = MetricsClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let dashboard = Dashboard::new(Arc::new(client));

        let state = dashboard.search("   ").await;
        assert!(!state.is_loading());
        assert!(state.error().unwrap().contains("Invalid ticker"));
    }
}
