use crate::{
    date,
    engine::{Engine, TimestampRange},
    error::{AnalysisCause, ArchiveError},
};

/// Derive the snapshot name for `index`.
///
/// Without analysis the snapshot is named after the index. With analysis
/// the observed timestamp range is appended, i.e
/// `graylog_12.20231114-2213.20231114-2313`.
pub async fn snapshot_name<E: Engine + ?Sized>(
    engine: &E, index: &str, analyze: bool,
) -> Result<String, ArchiveError> {
    if !analyze {
        return Ok(index.to_string());
    }

    let range = engine.timestamp_range(index).await.map_err(|e| {
        ArchiveError::Analysis { index: index.to_string(), cause: e.into() }
    })?;
    log::debug!("timestamp range of {}: {:?}", index, range);

    range_suffix(&range)
        .map(|(min, max)| format!("{}.{}.{}", index, min, max))
        .map_err(|cause| ArchiveError::Analysis {
            index: index.to_string(),
            cause,
        })
}

/// Render both ends of the range, failing when either is missing.
fn range_suffix(
    range: &TimestampRange,
) -> Result<(String, String), AnalysisCause> {
    let (min, max) = match (range.min, range.max) {
        (Some(min), Some(max)) => (min, max),
        _ => return Err(AnalysisCause::NoTimestamps),
    };
    let render = |millis: f64| {
        date::format_epoch_millis(millis)
            .ok_or(AnalysisCause::OutOfRange(millis))
    };
    Ok((render(min)?, render(max)?))
}
