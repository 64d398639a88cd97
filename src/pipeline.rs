//! Fetch-then-parse orchestration with a fail-soft contract.
//!
//! [`NewsPipeline`] takes an already-built search URL, fetches the body and
//! parses it. Whatever goes wrong, the caller receives a list of articles,
//! possibly empty. The cause of an empty list is logged and returned as a
//! [`Diagnostic`] alongside it, never raised.

use crate::fetch::{BodySource, FetchError};
use crate::models::ArticleRecord;
use crate::parse::{ParseIssue, parse_articles};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// The reason a search came back empty.
#[derive(Error, Debug)]
pub enum Diagnostic {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseIssue),
}

/// Result of one pipeline run.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// The articles, in provider order. Empty on any failure.
    pub articles: Vec<ArticleRecord>,
    /// Set when a stage failed.
    pub diagnostic: Option<Diagnostic>,
}

/// Stateless Fetch → Parse sequencer over a [`BodySource`].
#[derive(Debug, Clone)]
pub struct NewsPipeline<S> {
    source: S,
}

impl<S: BodySource> NewsPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch and parse the results behind `request_url`.
    ///
    /// Every failure degrades to an empty list; see [`Self::search`] to
    /// also get the cause.
    pub async fn fetch_articles(&self, request_url: &str) -> Vec<ArticleRecord> {
        self.search(request_url).await.articles
    }

    /// Like [`Self::fetch_articles`], but also returns what went wrong.
    ///
    /// A failed fetch is treated as an empty body, which parses to zero
    /// articles; the fetch error is the diagnostic in that case.
    #[instrument(level = "info", skip_all)]
    pub async fn search(&self, request_url: &str) -> SearchOutcome {
        let t0 = Instant::now();

        let (body, fetch_error) = match self.source.fetch_body(request_url).await {
            Ok(body) => (body, None),
            Err(e) => {
                warn!(error = %e, "Fetch failed; continuing with an empty body");
                (String::new(), Some(e))
            }
        };

        let parsed = parse_articles(&body);
        let diagnostic = fetch_error
            .map(Diagnostic::from)
            .or_else(|| parsed.issue.map(Diagnostic::from));

        info!(
            count = parsed.articles.len(),
            degraded = diagnostic.is_some(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Search finished"
        );

        SearchOutcome {
            articles: parsed.articles,
            diagnostic,
        }
    }
}
