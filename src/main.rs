//! # Guardian News
//!
//! Searches the Guardian content API and lists the matching articles in the
//! terminal, newest first by default.
//!
//! ## Usage
//!
//! ```sh
//! guardian_news -q wimbledon -n 20
//! guardian_news --interactive
//! ```
//!
//! ## Architecture
//!
//! Every search runs the same stateless pipeline:
//! 1. **Build**: compose the search URL from the preferences and the query
//! 2. **Fetch**: one GET with connect/read timeouts, no retries
//! 3. **Parse**: extract one article record per result entry
//!
//! Any failure along the way degrades to an empty list; the cause goes to
//! the log. A connectivity check runs before each search, and in
//! interactive mode a new query supersedes the one still loading.

use clap::Parser;
use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod connectivity;
mod fetch;
mod loader;
mod models;
mod outputs;
mod parse;
mod pipeline;
mod query;
mod session;
#[cfg(test)]
mod test_support;
mod utils;

use cli::Cli;
use config::Preferences;
use connectivity::NO_CONNECTION_MESSAGE;
use fetch::{BodySource, HttpFetcher};
use loader::SearchLoader;
use pipeline::NewsPipeline;
use query::{build_search_url, normalize_query};
use session::{Session, network_available, present};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args.query, interactive = args.interactive, "Parsed CLI arguments");

    let prefs = Preferences::load(args.config.as_deref().map(Path::new)).await?;
    let prefs = args.apply_to(prefs);
    info!(
        endpoint = %prefs.endpoint,
        section = %prefs.section,
        page_size = %prefs.page_size,
        order_by = %prefs.order_by,
        "Preferences ready"
    );

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    let fetcher = HttpFetcher::new(prefs.fetch_config())?;
    let pipeline = Arc::new(NewsPipeline::new(fetcher));

    if args.interactive {
        run_interactive(&args, &prefs, pipeline).await
    } else {
        run_once(&args, &prefs, &pipeline).await
    }
}

/// Run a single search for `--query` (or the latest articles) and print it.
async fn run_once<S: BodySource>(
    args: &Cli,
    prefs: &Preferences,
    pipeline: &NewsPipeline<S>,
) -> Result<(), Box<dyn Error>> {
    let mut out = std::io::stdout();
    if !network_available(prefs, !args.skip_connectivity_check).await {
        writeln!(out, "{NO_CONNECTION_MESSAGE}")?;
        return Ok(());
    }

    let query = args.query.as_deref().and_then(normalize_query);
    if let Some(q) = &query {
        info!(query = %q, "Searching for");
    }
    let url = build_search_url(&prefs.endpoint, &prefs.search_request(query.clone()));
    let articles = pipeline.fetch_articles(&url).await;
    present(&mut out, &articles, query, args.json_output_dir.as_deref()).await?;
    Ok(())
}

/// Read queries from stdin until it closes.
async fn run_interactive(
    args: &Cli,
    prefs: &Preferences,
    pipeline: Arc<NewsPipeline<HttpFetcher>>,
) -> Result<(), Box<dyn Error>> {
    let loader = SearchLoader::new(pipeline);
    let mut session = Session::new(
        prefs,
        loader,
        !args.skip_connectivity_check,
        args.json_output_dir.as_deref(),
    );
    let stdin = BufReader::new(tokio::io::stdin());
    session
        .run(stdin, &mut std::io::stdout(), args.query.clone())
        .await
}
