mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use weatherscrape::{RetryPolicy, WeatherScraper};

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; every option can also come from the command line.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let scraper = WeatherScraper::builder()
        .api_key(args.api_key)
        .maybe_base_url(args.base_url)
        .units(args.units)
        .maybe_cache_folder(args.cache_dir)
        .use_cache(!args.no_cache)
        .concurrency(args.concurrency)
        .retry(RetryPolicy::builder().max_attempts(args.max_attempts).build())
        .build()
        .await
        .context("Failed to set up the scraper")?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                cancel.cancel();
            }
        }
    });

    let report = scraper
        .scrape_to_csv()
        .station(&args.station)
        .start(args.start)
        .end(args.end)
        .interval(args.interval)
        .output(&args.output)
        .cancel(cancel)
        .call()
        .await
        .with_context(|| format!("Scraping {} failed", args.station))?;

    info!(
        "Saved {} observations of {} to {}",
        report.dataset.len(),
        args.station,
        args.output.display()
    );

    if !report.is_complete() {
        eprintln!("{} date(s) could not be fetched:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {failure}");
        }
    }

    if let Some(path) = args.failures {
        tokio::task::spawn_blocking(move || report.write_failures_csv(&path))
            .await?
            .context("Failed to write the failure report")?;
    }
    Ok(())
}
