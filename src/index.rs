/// Numeric suffix of an index name: the trailing run of ASCII digits.
///
/// Names without trailing digits get 0, so they sort before any numbered
/// index. A run too long for `u64` saturates at `u64::MAX`.
pub fn index_suffix(name: &str) -> u64 {
    let digits = name
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let run = &name[name.len() - digits..];
    run.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

/// Sort index names by ascending numeric suffix.
///
/// The sort is stable, indices with equal suffixes keep the order the
/// engine returned them in.
pub fn sort_by_suffix(mut indices: Vec<String>) -> Vec<String> {
    indices.sort_by_key(|i| index_suffix(i));
    indices
}

/// Indices eligible for archival: everything but the `bypass` most recent.
///
/// `indices` must already be sorted with [`sort_by_suffix`]. Returns an
/// empty slice when there are no more indices than `bypass`.
pub fn archive_candidates(indices: &[String], bypass: usize) -> &[String] {
    let keep = indices.len().saturating_sub(bypass);
    &indices[..keep]
}

/// Split a comma separated pattern list, i.e `graylog_*, audit_*`, dropping
/// blank entries.
pub fn split_patterns(pattern: &str) -> Vec<&str> {
    pattern
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
