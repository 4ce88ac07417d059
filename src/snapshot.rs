use crate::{
    engine::Engine,
    error::{ArchiveError, EngineError},
};

/// What happened to one index's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// A creation request was accepted by the engine.
    Created,
    /// The lookup found the snapshot, no creation request was sent.
    Exists,
    /// The engine refused to create it because the name is already taken.
    Duplicate,
}

/// Make sure `repository` holds a snapshot named `snapshot` of `index`.
///
/// The existence check fails open: if the lookup itself errors we log it
/// and go ahead with creation. A duplicate rejected by the engine is then
/// reported as [`SnapshotOutcome::Duplicate`] rather than as an error.
pub async fn ensure_snapshot<E: Engine + ?Sized>(
    engine: &E, repository: &str, index: &str, snapshot: &str,
) -> Result<SnapshotOutcome, ArchiveError> {
    match engine.snapshot_exists(repository, snapshot).await {
        Ok(true) => {
            log::info!(
                "snapshot {} already exists in {}, skipping creation",
                snapshot,
                repository
            );
            return Ok(SnapshotOutcome::Exists);
        }
        Ok(false) => {}
        Err(e) => {
            log::warn!(
                "error checking for snapshot {} in {}: {}, assuming it does \
                 not exist",
                snapshot,
                repository,
                e
            );
        }
    }

    log::info!("creating snapshot for index {}: {}", index, snapshot);
    match engine.create_snapshot(repository, index, snapshot).await {
        Ok(()) => Ok(SnapshotOutcome::Created),
        Err(e) if is_duplicate_rejection(&e) => {
            log::info!(
                "snapshot {} was rejected as a duplicate, skipping",
                snapshot
            );
            Ok(SnapshotOutcome::Duplicate)
        }
        Err(source) => Err(ArchiveError::Creation {
            index: index.to_string(),
            snapshot: snapshot.to_string(),
            source,
        }),
    }
}

/// True if the engine rejected a create request because a snapshot with
/// the same name is already in the repository.
///
/// The error looks like:
///
/// ```json
/// {
///   "error" : {
///     "type" : "invalid_snapshot_name_exception",
///     "reason" : "[backup:graylog_1] Invalid snapshot name [graylog_1], snapshot with the same name already exists"
///   },
///   "status" : 400
/// }
/// ```
pub fn is_duplicate_rejection(e: &EngineError) -> bool {
    match e {
        EngineError::Status { status: 400, body } => {
            body.contains("invalid_snapshot_name_exception")
                && body.contains("already exists")
        }
        _ => false,
    }
}
