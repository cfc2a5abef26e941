pub mod error;

pub use error::{ClientError, ClientResult};

use async_trait::async_trait;
use metrics_core::{Metrics, MetricsError, MetricsSource};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the metrics backend lives and how long to wait for it
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` leaves the request unbounded
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `BULLSEYE_API_URL` and `BULLSEYE_API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BULLSEYE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("BULLSEYE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            timeout,
            ..Self::new(base_url)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// HTTP client for the metrics backend. One attempt per call: no retries,
/// no caching.
#[derive(Clone)]
pub struct MetricsClient {
    client: Client,
    base_url: Url,
}

impl MetricsClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidBaseUrl(config.base_url.clone()))?;

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Metrics snapshot for one company. The ticker is sent as a single
    /// percent-encoded path segment.
    pub async fn fetch_metrics(&self, ticker: &str) -> ClientResult<Metrics> {
        let ticker = normalize_ticker(ticker)?;
        let url = self.endpoint(&["companies", ticker.as_str()])?;
        self.get_json(url).await
    }

    /// Snapshots for every company the backend tracks
    pub async fn fetch_all_metrics(&self) -> ClientResult<Vec<Metrics>> {
        let url = self.endpoint(&["companies"])?;
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        let url_str = url.to_string();
        let url = url_str.as_str();
        tracing::debug!(url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(url, error = %e, "Metrics request did not complete");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Metrics backend returned an error");
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(url, error = %e, "Metrics response did not parse");
            ClientError::Deserialization(e)
        })
    }
}

/// Lowercased, trimmed ticker for use in a request path
pub fn normalize_ticker(ticker: &str) -> ClientResult<String> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidTicker(ticker.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

#[async_trait]
impl MetricsSource for MetricsClient {
    async fn fetch_metrics(&self, ticker: &str) -> Result<Metrics, MetricsError> {
        MetricsClient::fetch_metrics(self, ticker)
            .await
            .map_err(MetricsError::from)
    }

    async fn fetch_all_metrics(&self) -> Result<Vec<Metrics>, MetricsError> {
        MetricsClient::fetch_all_metrics(self)
            .await
            .map_err(MetricsError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use metrics_core::Trend;
    use serde_json::json;

    fn client_for(server: &MockServer) -> MetricsClient {
        MetricsClient::new(ClientConfig::new(server.base_url())).unwrap()
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.timeout.is_none());

        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" AAPL ").unwrap(), "aapl");
        assert!(matches!(
            normalize_ticker("   "),
            Err(ClientError::InvalidTicker(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_metrics_lowercases_path() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/aapl");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "ticker": "aapl",
                        "companyName": "Apple Inc.",
                        "grossMarginTtm": 45.5,
                        "grossMarginLongTermTrend": "Uptrend"
                    }));
            })
            .await;

        let metrics = client_for(&server).fetch_metrics("AAPL").await.unwrap();

        mock.assert_async().await;
        assert_eq!(metrics.ticker, "aapl");
        assert_eq!(metrics.gross_margin_ttm, Some(45.5));
        assert_eq!(metrics.gross_margin_long_term_trend, Some(Trend::Uptrend));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = MetricsClient::new(ClientConfig::new("not a url")).err();
        assert!(matches!(err, Some(ClientError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        let client = MetricsClient::new(ClientConfig::new("http://localhost:3000/api/")).unwrap();
        let url = client.endpoint(&["companies", "aapl"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/companies/aapl");
    }

    #[tokio::test]
    async fn test_ticker_stays_one_path_segment() {
        let server = MockServer::start_async().await;
        let nested = server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/brk/b");
                then.status(200).json_body(json!({ "ticker": "wrong-route" }));
            })
            .await;
        let apple = server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/aapl");
                then.status(200).json_body(json!({ "ticker": "aapl" }));
            })
            .await;

        let client = client_for(&server);
        let url = client.endpoint(&["companies", "brk/b"]).unwrap();
        assert!(url.path().ends_with("/companies/brk%2Fb"));
        let url = client.endpoint(&["companies", "aapl?x=1"]).unwrap();
        assert!(url.path().ends_with("/companies/aapl%3Fx=1"));
        assert_eq!(url.query(), None);

        let slashed = client.fetch_metrics("BRK/B").await;
        assert!(!matches!(slashed, Ok(ref m) if m.ticker == "wrong-route"));
        let queried = client.fetch_metrics("aapl?x=1").await;
        assert!(!matches!(queried, Ok(ref m) if m.ticker == "aapl"));

        nested.assert_hits_async(0).await;
        apple.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_fetch_all_metrics() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies");
                then.status(200)
                    .json_body(json!([{ "ticker": "aapl" }, { "ticker": "7203" }]));
            })
            .await;

        let all = client_for(&server).fetch_all_metrics().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].ticker, "7203");
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/zzzz");
                then.status(500).body("scraper failed");
            })
            .await;

        let err = client_for(&server).fetch_metrics("zzzz").await.unwrap_err();
        match &err {
            ClientError::HttpStatus { status, body } => {
                assert_eq!(*status, 500);
                assert_eq!(body, "scraper failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.status(), Some(500));
        let message = err.user_message();
        assert!(message.starts_with("There was an error retrieving data."));
        assert!(message.contains("Status: 500, Message: scraper failed"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_deserialization_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/aapl");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let err = client_for(&server).fetch_metrics("aapl").await.unwrap_err();
        assert!(matches!(err, ClientError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = MetricsClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let err = client.fetch_metrics("aapl").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_empty_ticker_is_rejected_before_sending() {
        let client = MetricsClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let err = client.fetch_metrics("").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidTicker(_)));
    }

    #[tokio::test]
    async fn test_source_trait_maps_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/companies/msft");
                then.status(404).body("unknown ticker");
            })
            .await;

        let source: &dyn MetricsSource = &client_for(&server);
        let err = source.fetch_metrics("msft").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("unknown ticker"));
    }
}
