use crate::{
    archive::ArchivePlan, error::ArchiveError, index::split_patterns,
};
use std::env;
use structopt::StructOpt;

/// Archive OpenSearch indices into a snapshot repository
#[derive(StructOpt, Debug)]
#[structopt(name = "opensearch-snapshot-archiver")]
pub struct Opt {
    /// Activate debug logging
    #[structopt(short, long)]
    pub debug: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,

    /// Indices pattern, or use OPENSEARCH_INDEX_PATTERN env
    ///
    /// i.e: "graylog_*", several patterns may be comma separated
    #[structopt(short, long)]
    pub pattern: Option<String>,

    /// OpenSearch URL, or use OPENSEARCH_URL env
    #[structopt(short, long)]
    pub url: Option<String>,

    /// Number of latest indices to bypass
    #[structopt(short, long)]
    pub bypass: usize,

    /// Snapshot repository name in OpenSearch, or use OPENSEARCH_REPO env
    #[structopt(short, long)]
    pub repo: Option<String>,

    /// Enable min/max timestamp analysis for indices
    #[structopt(short, long)]
    pub analyze: bool,

    /// Wait for each snapshot to finish before moving on
    #[structopt(short, long)]
    pub wait_for_completion: bool,
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub plan: ArchivePlan,
    pub wait_for_completion: bool,
}

impl Opt {
    /// Log filter implied by `--debug` and `-v`, `None` keeps the default.
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        match (self.debug, self.verbose) {
            (_, v) if v >= 2 => Some(log::LevelFilter::Trace),
            (true, _) | (_, 1) => Some(log::LevelFilter::Debug),
            _ => None,
        }
    }

    /// Resolve env fallbacks and check every required value is present.
    pub fn into_settings(self) -> Result<Settings, ArchiveError> {
        let pattern = value_or_env("OPENSEARCH_INDEX_PATTERN", self.pattern)?;
        // an empty list would hit `_cat/indices/` and match every index
        if split_patterns(&pattern).is_empty() {
            return Err(ArchiveError::Config(format!(
                "no index pattern in {:?}",
                pattern
            )));
        }
        let url = value_or_env("OPENSEARCH_URL", self.url)?;
        let repository = value_or_env("OPENSEARCH_REPO", self.repo)?;

        Ok(Settings {
            url,
            plan: ArchivePlan {
                pattern,
                repository,
                bypass: self.bypass,
                analyze: self.analyze,
            },
            wait_for_completion: self.wait_for_completion,
        })
    }
}

/// Use `other` if given, otherwise read `key` from the environment. An empty
/// value counts as missing.
pub fn value_or_env(
    key: &str, other: Option<String>,
) -> Result<String, ArchiveError> {
    let value = match other {
        Some(v) => v,
        None => env::var(key).unwrap_or_default(),
    };
    if value.trim().is_empty() {
        return Err(ArchiveError::Config(format!(
            "{} must be set, use --help for usage instructions",
            key
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(args: &[&str]) -> Opt {
        let mut argv = vec!["opensearch-snapshot-archiver"];
        argv.extend_from_slice(args);
        Opt::from_iter_safe(argv).unwrap()
    }

    #[test]
    fn parses_all_flags() {
        let o = opt(&[
            "--pattern",
            "graylog_*",
            "--url",
            "http://localhost:9200",
            "--bypass",
            "2",
            "--repo",
            "backup",
            "--analyze",
        ]);
        let s = o.into_settings().unwrap();
        assert_eq!(s.url, "http://localhost:9200");
        assert_eq!(
            s.plan,
            ArchivePlan {
                pattern: "graylog_*".into(),
                repository: "backup".into(),
                bypass: 2,
                analyze: true,
            }
        );
        assert!(!s.wait_for_completion);
    }

    #[test]
    fn bypass_is_required() {
        let r = Opt::from_iter_safe(vec![
            "opensearch-snapshot-archiver",
            "--pattern",
            "graylog_*",
            "--url",
            "http://localhost:9200",
            "--repo",
            "backup",
        ]);
        assert!(r.is_err());
    }

    #[test]
    fn empty_value_is_a_config_error() {
        let o = opt(&[
            "--pattern",
            "",
            "--url",
            "http://localhost:9200",
            "--bypass",
            "0",
            "--repo",
            "backup",
        ]);
        match o.into_settings() {
            Err(ArchiveError::Config(msg)) => {
                assert!(msg.contains("OPENSEARCH_INDEX_PATTERN"))
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn pattern_of_only_separators_is_a_config_error() {
        for pattern in &[",", " , ,"] {
            let o = opt(&[
                "--pattern",
                *pattern,
                "--url",
                "http://localhost:9200",
                "--bypass",
                "0",
                "--repo",
                "backup",
            ]);
            match o.into_settings() {
                Err(ArchiveError::Config(msg)) => {
                    assert!(msg.contains("no index pattern"))
                }
                other => panic!("expected config error, got {:?}", other),
            }
        }
    }

    #[test]
    fn flag_value_wins_over_missing_env() {
        assert_eq!(
            value_or_env(
                "OPENSEARCH_ARCHIVER_TEST_UNSET",
                Some("backup".into())
            )
            .unwrap(),
            "backup"
        );
        assert!(value_or_env("OPENSEARCH_ARCHIVER_TEST_UNSET", None).is_err());
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        let base = ["--bypass", "0"];
        assert_eq!(opt(&base).log_level(), None);
        assert_eq!(
            opt(&["-d", "--bypass", "0"]).log_level(),
            Some(log::LevelFilter::Debug)
        );
        assert_eq!(
            opt(&["-v", "--bypass", "0"]).log_level(),
            Some(log::LevelFilter::Debug)
        );
        assert_eq!(
            opt(&["-vv", "--bypass", "0"]).log_level(),
            Some(log::LevelFilter::Trace)
        );
    }
}
