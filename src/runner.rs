use std::path::Path;

use crate::cli::Cli;
use js_param_miner::config::{Config, Mode};
use js_param_miner::http_client::HttpFetcher;
use js_param_miner::utils::read_url_list;
use js_param_miner::Pipeline;

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the extracted items.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else { "warn" };
    let filter_str = format!(
        "js_param_miner={crate},reqwest=info,hyper=info,h2=info",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .init();

    let config = Config {
        mode: if cli.only_params { Mode::Parameters } else { Mode::Endpoints },
        output: cli.output,
        verbose: cli.show_source,
        workers: cli.threads,
        dedup: cli.dedup,
        ..Config::default()
    };
    tracing::info!(mode=?config.mode, workers=config.workers, dedup=?config.dedup, "starting");

    let pipeline = Pipeline::new(HttpFetcher::new()?, config);

    if let Some(url) = cli.single_url {
        pipeline.process(&url).await;
    } else if let Some(list) = cli.urls_list {
        let urls = read_url_list(Path::new(&list))?;
        let summary = pipeline.process_list(urls).await;
        tracing::info!(
            processed = summary.processed,
            failed = summary.failed + summary.bad_status,
            "finished"
        );
    }
    Ok(())
}
