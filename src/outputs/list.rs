//! Text rendering of search results.
//!
//! [`row`] is a pure mapping from an article and its position to what a list
//! entry shows; [`render_list`] lays those rows out for the terminal.

use crate::models::ArticleRecord;
use scraper::Html;
use serde::Serialize;
use std::fmt::Write;

/// Shown when a search produced no articles.
pub const NO_RESULTS_MESSAGE: &str = "No news found.";
/// Shown when the user submits an empty query.
pub const EMPTY_QUERY_MESSAGE: &str = "Type something to search";

/// Everything one list entry displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRow {
    /// 1-based position in the list.
    pub position: usize,
    pub title: String,
    pub section: String,
    pub published_at: String,
    /// Description with markup removed and whitespace collapsed.
    pub summary: String,
    /// Link to open for the full article.
    pub url: String,
}

/// Map the article at `index` (0-based) to its row.
pub fn row(article: &ArticleRecord, index: usize) -> ArticleRow {
    ArticleRow {
        position: index + 1,
        title: article.title().to_string(),
        section: article.section().to_string(),
        published_at: article.published_at().to_string(),
        summary: markup_to_text(article.description()),
        url: article.url().to_string(),
    }
}

/// Strip HTML markup from a trail text, keeping its visible text.
pub fn markup_to_text(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(markup);
    let text = fragment.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render articles as a numbered list, or the empty-state message.
pub fn render_list(articles: &[ArticleRecord]) -> String {
    if articles.is_empty() {
        return format!("{NO_RESULTS_MESSAGE}\n");
    }

    let mut out = String::new();
    for (i, article) in articles.iter().enumerate() {
        let row = row(article, i);
        let _ = writeln!(out, "{:>2}. {}", row.position, row.title);

        let meta = [row.section.as_str(), row.published_at.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        for line in [meta.as_str(), row.summary.as_str(), row.url.as_str()] {
            if !line.is_empty() {
                let _ = writeln!(out, "    {line}");
            }
        }
        out.push('\n');
    }
    out
}
