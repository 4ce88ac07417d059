use crate::{
    engine::{Engine, TimestampRange},
    error::EngineError,
    index::split_patterns,
};
use async_trait::async_trait;
use elasticsearch::{
    cat::CatIndicesParts,
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    snapshot::{SnapshotCreateParts, SnapshotGetParts},
    Elasticsearch, Error, SearchParts,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use url::Url;

#[derive(Deserialize, Debug)]
struct CatIndex {
    /// index name
    index: String,
}

#[derive(Deserialize, Debug)]
struct AggregationResponse {
    aggregations: TimestampAggregations,
}

#[derive(Deserialize, Debug)]
struct TimestampAggregations {
    min_time: AggregationValue,
    max_time: AggregationValue,
}

#[derive(Deserialize, Debug)]
struct AggregationValue {
    /// null when no document has the field
    #[serde(default)]
    value: Option<f64>,
}

/// Body of a create request sent with `wait_for_completion=true`
#[derive(Deserialize, Debug)]
struct CreatedSnapshot {
    snapshot: SnapshotState,
}

#[derive(Deserialize, Debug)]
struct SnapshotState {
    state: String,
}

/// Create a client talking to a single OpenSearch node
pub fn create_client(addr: &str) -> anyhow::Result<Elasticsearch, Error> {
    let url = Url::parse(addr)?;

    let conn_pool = SingleNodeConnectionPool::new(url);
    let builder = TransportBuilder::new(conn_pool);

    let transport = builder.build()?;
    Ok(Elasticsearch::new(transport))
}

/// [`Engine`] backed by an OpenSearch cluster.
///
/// OpenSearch still speaks the Elasticsearch 7 REST API, so the
/// `elasticsearch` client is used as is.
pub struct OpenSearch {
    client: Elasticsearch,
    wait_for_completion: bool,
}

impl OpenSearch {
    pub fn new(client: Elasticsearch, wait_for_completion: bool) -> Self {
        OpenSearch { client, wait_for_completion }
    }
}

/// Turn a non-success response into [`EngineError::Status`], keeping the
/// body for the log.
async fn check_status(response: Response) -> Result<Response, EngineError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await?;
    Err(EngineError::Status { status: status.as_u16(), body })
}

async fn decode<T: DeserializeOwned>(
    response: Response,
) -> Result<T, EngineError> {
    let body = response.text().await?;
    log::debug!("response body: {}", body);
    serde_json::from_str(&body).map_err(|e| EngineError::Decode(e.to_string()))
}

#[async_trait]
impl Engine for OpenSearch {
    /// `pattern` may be a comma separated list, i.e `graylog_*,audit_*`
    async fn list_indices(
        &self, pattern: &str,
    ) -> Result<Vec<String>, EngineError> {
        let patterns = split_patterns(pattern);
        let response = self
            .client
            .cat()
            .indices(CatIndicesParts::Index(&patterns))
            // h: Comma-separated list of column names to display
            .h(&["index"])
            .format("json")
            .send()
            .await?;

        log::debug!("calling cat indices response : {:?}", response);
        let indices: Vec<CatIndex> =
            decode(check_status(response).await?).await?;
        Ok(indices.into_iter().map(|i| i.index).collect())
    }

    /// Run a zero-hit search with min/max aggregations on `timestamp`.
    ///
    /// The response looks like:
    ///
    /// ```json
    /// {
    ///   "hits" : { "total" : { "value" : 1532, "relation" : "eq" }, "hits" : [ ] },
    ///   "aggregations" : {
    ///     "max_time" : { "value" : 1.7000036E12, "value_as_string" : "2023-11-14 23:13:20.000" },
    ///     "min_time" : { "value" : 1.7E12, "value_as_string" : "2023-11-14 22:13:20.000" }
    ///   }
    /// }
    /// ```
    ///
    /// On an empty index both `value`s are `null`.
    async fn timestamp_range(
        &self, index: &str,
    ) -> Result<TimestampRange, EngineError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .size(0)
            .body(json!({
              "aggs": {
                "min_time": { "min": { "field": "timestamp" } },
                "max_time": { "max": { "field": "timestamp" } }
              }
            }))
            .send()
            .await?;

        let result: AggregationResponse =
            decode(check_status(response).await?).await?;
        Ok(TimestampRange {
            min: result.aggregations.min_time.value,
            max: result.aggregations.max_time.value,
        })
    }

    /// A missing snapshot comes back as 404 `snapshot_missing_exception`.
    /// Any success status counts as found, whatever the body holds. A found
    /// snapshot looks like:
    ///
    /// ```json
    /// {
    ///   "snapshots" : [ {
    ///     "snapshot" : "graylog_12",
    ///     "uuid" : "BAtz3c9lTlud4Qn__HeqWA",
    ///     "indices" : [ "graylog_12" ],
    ///     "include_global_state" : false,
    ///     "state" : "SUCCESS"
    ///   } ]
    /// }
    /// ```
    async fn snapshot_exists(
        &self, repository: &str, snapshot: &str,
    ) -> Result<bool, EngineError> {
        let response = self
            .client
            .snapshot()
            .get(SnapshotGetParts::RepositorySnapshot(repository, &[snapshot]))
            .send()
            .await?;

        log::debug!("snapshot get response: {:?}", response);
        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    /// With `wait_for_completion` the engine answers 200 once the snapshot
    /// is done, even when it failed, so the final state is checked:
    ///
    /// ```json
    /// {
    ///   "snapshot" : {
    ///     "snapshot" : "graylog_12",
    ///     "indices" : [ "graylog_12" ],
    ///     "state" : "SUCCESS",
    ///     "shards" : { "total" : 4, "failed" : 0, "successful" : 4 }
    ///   }
    /// }
    /// ```
    async fn create_snapshot(
        &self, repository: &str, index: &str, snapshot: &str,
    ) -> Result<(), EngineError> {
        let response = self
            .client
            .snapshot()
            .create(SnapshotCreateParts::RepositorySnapshot(
                repository, snapshot,
            ))
            .wait_for_completion(self.wait_for_completion)
            .body(json!({
              "indices": index,
              "include_global_state": false,
              "metadata": {
                "taken_by": env!("CARGO_PKG_NAME"),
                "taken_because": "index archival"
              }
            }))
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.text().await?;
        log::debug!("create snapshot response: {}", body);
        if !self.wait_for_completion {
            return Ok(());
        }

        let created: CreatedSnapshot = serde_json::from_str(&body)
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        if created.snapshot.state != "SUCCESS" {
            return Err(EngineError::SnapshotFailed {
                state: created.snapshot.state,
                body,
            });
        }
        Ok(())
    }
}
