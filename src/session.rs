//! Line-driven search session: queries in, rendered lists out.
//!
//! [`Session::run`] reads one query per line. Every submitted query goes
//! through the connectivity gate and then restarts the [`SearchLoader`], so
//! only the newest search is ever printed. When input ends, the search still
//! loading is awaited and printed.

use crate::config::Preferences;
use crate::connectivity::{NO_CONNECTION_MESSAGE, is_connected};
use crate::fetch::BodySource;
use crate::loader::SearchLoader;
use crate::models::{ArticleRecord, SearchResults};
use crate::outputs::{json, list};
use crate::query::{build_search_url, normalize_query};
use chrono::Local;
use std::error::Error;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info};

/// Interactive search over one loader.
pub struct Session<'a, S> {
    prefs: &'a Preferences,
    loader: SearchLoader<S>,
    check_connectivity: bool,
    json_output_dir: Option<&'a str>,
}

impl<'a, S> Session<'a, S>
where
    S: BodySource + Send + Sync + 'static,
{
    pub fn new(
        prefs: &'a Preferences,
        loader: SearchLoader<S>,
        check_connectivity: bool,
        json_output_dir: Option<&'a str>,
    ) -> Self {
        Self {
            prefs,
            loader,
            check_connectivity,
            json_output_dir,
        }
    }

    /// Run until `input` is exhausted.
    ///
    /// # Arguments
    ///
    /// * `input` - Query lines; an empty line prints [`list::EMPTY_QUERY_MESSAGE`]
    /// * `out` - Where messages and result lists are written
    /// * `initial_query` - Loaded before the first line is read; `None` loads
    ///   the latest articles
    ///
    /// # Returns
    ///
    /// `Ok(())` when input ends, or the first I/O error on `input` or `out`.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        out: &mut W,
        initial_query: Option<String>,
    ) -> Result<(), Box<dyn Error>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut current_query = initial_query.as_deref().and_then(normalize_query);
        self.start(current_query.clone(), out).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let Some(query) = normalize_query(&line) else {
                        writeln!(out, "{}", list::EMPTY_QUERY_MESSAGE)?;
                        continue;
                    };
                    writeln!(out, "Searching for: {query}")?;
                    if self.start(Some(query.clone()), out).await? {
                        current_query = Some(query);
                    }
                }
                Some(finished) = self.loader.next_finished(), if self.loader.is_loading() => {
                    if let Some(diagnostic) = &finished.outcome.diagnostic {
                        debug!(generation = finished.generation, %diagnostic, "Search came back degraded");
                    }
                    present(out, &finished.outcome.articles, current_query.clone(), self.json_output_dir).await?;
                }
            }
        }

        // Input closed; still show the search that was loading.
        if let Some(finished) = self.loader.next_finished().await {
            present(out, &finished.outcome.articles, current_query, self.json_output_dir).await?;
        }
        Ok(())
    }

    /// Restart the loader for `query` unless the network is down.
    ///
    /// Returns whether a search was started.
    async fn start<W: Write>(&mut self, query: Option<String>, out: &mut W) -> std::io::Result<bool> {
        if !network_available(self.prefs, self.check_connectivity).await {
            writeln!(out, "{NO_CONNECTION_MESSAGE}")?;
            return Ok(false);
        }
        let url = build_search_url(&self.prefs.endpoint, &self.prefs.search_request(query));
        self.loader.restart(url);
        Ok(true)
    }
}

/// Run the connectivity check against the configured endpoint.
///
/// Always `true` when `check` is off.
pub async fn network_available(prefs: &Preferences, check: bool) -> bool {
    if !check {
        return true;
    }
    let limit = Duration::from_secs(prefs.connect_timeout_secs);
    is_connected(&prefs.endpoint, limit).await
}

/// Write the rendered list to `out` and, if a directory is given, a JSON
/// snapshot of it.
///
/// # Arguments
///
/// * `out` - Destination of the rendered list
/// * `articles` - The search results, in provider order
/// * `query` - The normalized query, used to name the snapshot
/// * `json_output_dir` - Snapshot directory; `None` skips the snapshot
///
/// # Returns
///
/// An error only if writing to `out` fails. A failed snapshot is logged.
pub async fn present<W: Write>(
    out: &mut W,
    articles: &[ArticleRecord],
    query: Option<String>,
    json_output_dir: Option<&str>,
) -> std::io::Result<()> {
    write!(out, "{}", list::render_list(articles))?;
    out.flush()?;
    info!(count = articles.len(), "Presented search results");

    let Some(dir) = json_output_dir else {
        return Ok(());
    };
    let now = Local::now();
    let results = SearchResults {
        query,
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        articles: articles.to_vec(),
    };
    if let Err(e) = json::write_results(&results, dir).await {
        error!(error = %e, "Failed to write JSON results");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::NewsPipeline;
    use crate::test_support::{EchoQuery, refused_url};
    use std::sync::Arc;

    fn session(prefs: &Preferences, check_connectivity: bool) -> Session<'_, EchoQuery> {
        let source = EchoQuery {
            delay: Duration::from_millis(300),
        };
        let loader = SearchLoader::new(Arc::new(NewsPipeline::new(source)));
        Session::new(prefs, loader, check_connectivity, None)
    }

    async fn run(session: &mut Session<'_, EchoQuery>, input: &str, initial: Option<&str>) -> String {
        let mut out = Vec::new();
        session
            .run(input.as_bytes(), &mut out, initial.map(str::to_string))
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_initial_query_is_shown_when_input_is_empty() {
        let prefs = Preferences::default();
        let out = run(&mut session(&prefs, false), "", Some("ashes")).await;
        assert_eq!(out, " 1. ashes\n\n");
    }

    #[tokio::test]
    async fn test_empty_line_prompts_for_input() {
        let prefs = Preferences::default();
        let out = run(&mut session(&prefs, false), "   \n", Some("ashes")).await;
        // The initial load may land before or after the prompt.
        assert!(out.contains("Type something to search\n"));
        assert_eq!(out.matches(" 1. ashes\n\n").count(), 1);
    }

    #[tokio::test]
    async fn test_later_query_supersedes_slow_one() {
        let prefs = Preferences::default();
        let out = run(&mut session(&prefs, false), "slow query\nfast\n", None).await;
        assert!(out.contains("Searching for: slowquery\n"));
        assert!(out.contains("Searching for: fast\n"));
        assert!(!out.contains(" 1. slowquery"));
        assert!(out.ends_with(" 1. fast\n\n"));
    }

    #[tokio::test]
    async fn test_offline_endpoint_blocks_every_search() {
        let prefs = Preferences {
            endpoint: refused_url().await,
            ..Preferences::default()
        };
        let out = run(&mut session(&prefs, true), "wimbledon\n", None).await;
        assert_eq!(
            out,
            "No internet connection.\nSearching for: wimbledon\nNo internet connection.\n"
        );
    }

    #[tokio::test]
    async fn test_present_empty_list() {
        let mut out = Vec::new();
        present(&mut out, &[], None, None).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No news found.\n");
    }
}
