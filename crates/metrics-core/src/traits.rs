use async_trait::async_trait;
use crate::{Metrics, MetricsError};

/// Anything that can hand out metrics snapshots: the HTTP client in
/// production, in-memory fixtures in tests.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_metrics(&self, ticker: &str) -> Result<Metrics, MetricsError>;

    async fn fetch_all_metrics(&self) -> Result<Vec<Metrics>, MetricsError>;
}
