use crate::{
    engine::Engine,
    error::ArchiveError,
    index::{archive_candidates, sort_by_suffix},
    naming::snapshot_name,
    snapshot::{ensure_snapshot, SnapshotOutcome},
};

/// What to archive and where to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePlan {
    pub pattern: String,
    pub repository: String,
    /// How many of the most recent indices to leave alone
    pub bypass: usize,
    /// Append the min/max document timestamps to snapshot names
    pub analyze: bool,
}

/// Per-index results of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Snapshot names that were created
    pub created: Vec<String>,
    /// Snapshot names that already existed
    pub skipped: Vec<String>,
    /// Index names with the error that stopped them
    pub failed: Vec<(String, String)>,
}

impl ArchiveReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn fail(&mut self, index: &str, e: &ArchiveError) {
        log::error!("{}", e);
        self.failed.push((index.to_string(), e.to_string()));
    }
}

/// Snapshot every index matching the plan's pattern except the `bypass`
/// most recent ones.
///
/// Only the listing can fail the run. Errors on a single index are logged,
/// recorded in the report, and the next index is processed.
pub async fn archive_indices<E: Engine + ?Sized>(
    engine: &E, plan: &ArchivePlan,
) -> Result<ArchiveReport, ArchiveError> {
    let indices = engine.list_indices(&plan.pattern).await.map_err(|e| {
        ArchiveError::Connection { pattern: plan.pattern.clone(), source: e }
    })?;
    let indices = sort_by_suffix(indices);
    log::info!("pattern: {}, indices: {:?}", plan.pattern, indices);

    let mut report = ArchiveReport::default();
    let candidates = archive_candidates(&indices, plan.bypass);
    if candidates.is_empty() {
        log::info!("no indices to archive");
        return Ok(report);
    }
    log::info!(
        "{} indices to archive, bypassing the latest {}",
        candidates.len(),
        plan.bypass
    );

    for index in candidates {
        let snapshot =
            match snapshot_name(engine, index, plan.analyze).await {
                Ok(s) => s,
                Err(e) => {
                    report.fail(index, &e);
                    continue;
                }
            };

        match ensure_snapshot(engine, &plan.repository, index, &snapshot)
            .await
        {
            Ok(SnapshotOutcome::Created) => {
                log::info!("snapshot created successfully: {}", snapshot);
                report.created.push(snapshot);
            }
            Ok(SnapshotOutcome::Exists) | Ok(SnapshotOutcome::Duplicate) => {
                report.skipped.push(snapshot);
            }
            Err(e) => report.fail(index, &e),
        }
    }

    log::info!(
        "archive finished: {} created, {} skipped, {} failed",
        report.created.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}
