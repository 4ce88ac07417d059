use opensearch_snapshot_archiver::{
    archive::archive_indices,
    args::Opt,
    error::ArchiveError,
    es::{self, OpenSearch},
};
use structopt::StructOpt;

/// Exit code for a completed run where some indices could not be archived
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    );
    if let Some(level) = opt.log_level() {
        logger.filter_level(level);
    }
    logger.init();
    log::info!("OpenSearch snapshot archiver started!");

    let settings = opt.into_settings()?;
    let client = es::create_client(&settings.url).map_err(|e| {
        ArchiveError::Config(format!("invalid url {}: {}", settings.url, e))
    })?;
    let engine = OpenSearch::new(client, settings.wait_for_completion);

    let report = archive_indices(&engine, &settings.plan).await?;
    if report.has_failures() {
        std::process::exit(EXIT_PARTIAL_FAILURE);
    }

    Ok(())
}
