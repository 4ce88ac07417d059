use crate::error::EngineError;
use async_trait::async_trait;

/// Raw min/max aggregation values over the `timestamp` field, in epoch
/// milliseconds. `None` when the engine returned null.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimestampRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// The engine calls needed to archive indices.
///
/// [`crate::es::OpenSearch`] talks to a real cluster, tests substitute a
/// recording stub.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Names of all indices matching `pattern`, in discovery order.
    async fn list_indices(
        &self, pattern: &str,
    ) -> Result<Vec<String>, EngineError>;

    /// Min/max of the `timestamp` field across all documents of `index`.
    async fn timestamp_range(
        &self, index: &str,
    ) -> Result<TimestampRange, EngineError>;

    /// Whether `snapshot` is present in `repository`.
    async fn snapshot_exists(
        &self, repository: &str, snapshot: &str,
    ) -> Result<bool, EngineError>;

    /// Snapshot exactly `index` as `snapshot`, excluding global state.
    async fn create_snapshot(
        &self, repository: &str, index: &str, snapshot: &str,
    ) -> Result<(), EngineError>;
}
