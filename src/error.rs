use thiserror::Error;

/// Failure of a single call against the search engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The engine answered with a non-success status code.
    #[error("engine responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// A snapshot waited on to completion did not end in `SUCCESS`.
    #[error("snapshot finished with state {state}: {body}")]
    SnapshotFailed { state: String, body: String },
}

impl From<elasticsearch::Error> for EngineError {
    fn from(e: elasticsearch::Error) -> Self {
        EngineError::Transport(e.to_string())
    }
}

/// Why the timestamp range of an index could not be turned into a name.
#[derive(Error, Debug)]
pub enum AnalysisCause {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The aggregation returned null, usually because the index is empty.
    #[error("no timestamp values found")]
    NoTimestamps,

    #[error("timestamp {0} is out of range")]
    OutOfRange(f64),
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Missing or invalid settings. Fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// Listing indices failed. Fatal, no partial listing is used.
    #[error("failed to list indices matching {pattern}: {source}")]
    Connection {
        pattern: String,
        #[source]
        source: EngineError,
    },

    /// Naming one index failed. The index is skipped.
    #[error("failed to analyze index {index}: {cause}")]
    Analysis {
        index: String,
        #[source]
        cause: AnalysisCause,
    },

    /// Creating one snapshot failed. The run continues.
    #[error("failed to create snapshot {snapshot} for index {index}: {source}")]
    Creation {
        index: String,
        snapshot: String,
        #[source]
        source: EngineError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_snapshot_reports_its_state() {
        let e = EngineError::SnapshotFailed {
            state: "PARTIAL".into(),
            body: "{}".into(),
        };
        assert_eq!(e.to_string(), "snapshot finished with state PARTIAL: {}");
    }

    #[test]
    fn analysis_error_names_the_index() {
        let e = ArchiveError::Analysis {
            index: "graylog_7".into(),
            cause: AnalysisCause::NoTimestamps,
        };
        assert_eq!(
            e.to_string(),
            "failed to analyze index graylog_7: no timestamp values found"
        );
    }
}
