//! Extraction of [`ArticleRecord`]s from a Guardian search response.
//!
//! The expected document looks like:
//!
//! ```text
//! { "response": { "status": "ok", "results": [
//!     { "webTitle": ..., "sectionName": ..., "webPublicationDate": ...,
//!       "webUrl": ..., "fields": { "trailText": ... } }, ...
//! ] } }
//! ```
//!
//! Parsing never fails outward. A body that cannot be used yields an empty
//! list together with a [`ParseIssue`] describing why; a missing field in an
//! otherwise usable entry silently becomes `""`.

use crate::models::ArticleRecord;
use crate::utils::{looks_truncated, truncate_for_log};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a response body produced no articles.
#[derive(Error, Debug)]
pub enum ParseIssue {
    /// The body is not JSON.
    #[error("problem parsing the search JSON (truncated: {truncated}): {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        truncated: bool,
    },

    /// No `response` object at the top level.
    #[error("search JSON has no \"response\" object")]
    MissingResponse,

    /// The provider reported an error instead of results.
    #[error("provider returned an error: {0}")]
    Provider(String),

    /// The `response` object carries no `results` array.
    #[error("no results found")]
    MissingResults,
}

/// Articles extracted from one body, plus the reason if there are none.
#[derive(Debug, Default)]
pub struct ParsedArticles {
    pub articles: Vec<ArticleRecord>,
    pub issue: Option<ParseIssue>,
}

impl ParsedArticles {
    fn failed(issue: ParseIssue) -> Self {
        Self {
            articles: Vec::new(),
            issue: Some(issue),
        }
    }
}

/// Parse a search response body into article records.
///
/// - Empty or blank input yields an empty list and no issue.
/// - Unusable input yields an empty list and an issue.
/// - Otherwise one record per entry of `response.results`, in source order.
///
/// # Arguments
///
/// * `body` - The raw response text, possibly empty
///
/// # Returns
///
/// The extracted records plus, when the body was unusable, the
/// [`ParseIssue`] explaining why the list is empty.
pub fn parse_articles(body: &str) -> ParsedArticles {
    if body.trim().is_empty() {
        debug!("Empty response body; nothing to parse");
        return ParsedArticles::default();
    }

    let root: Value = match serde_json::from_str(body) {
        Ok(root) => root,
        Err(e) => {
            let truncated = looks_truncated(&e);
            error!(
                error = %e,
                truncated,
                body_preview = %truncate_for_log(body, 300),
                "Problem parsing the search JSON results"
            );
            return ParsedArticles::failed(ParseIssue::InvalidJson {
                source: e,
                truncated,
            });
        }
    };

    let Some(response) = root.get("response").filter(|r| r.is_object()) else {
        warn!("Search JSON has no response object");
        return ParsedArticles::failed(ParseIssue::MissingResponse);
    };

    if response.get("status").and_then(Value::as_str) == Some("error") {
        let message = text_field(response.get("message"));
        warn!(%message, "Provider returned an error");
        return ParsedArticles::failed(ParseIssue::Provider(message));
    }

    let Some(results) = response.get("results").and_then(Value::as_array) else {
        info!("No results found");
        return ParsedArticles::failed(ParseIssue::MissingResults);
    };

    let articles: Vec<ArticleRecord> = results.iter().map(article_from_entry).collect();
    debug!(count = articles.len(), "Parsed search results");
    ParsedArticles {
        articles,
        issue: None,
    }
}

/// Build one record from a result entry. Absent fields become `""`.
fn article_from_entry(entry: &Value) -> ArticleRecord {
    let description = text_field(entry.get("fields").and_then(|f| f.get("trailText")));
    let published_at = match entry.get("webPublicationDate") {
        Some(date) => format_publication_date(&text_field(Some(date))),
        None => String::new(),
    };

    ArticleRecord::new(
        text_field(entry.get("webTitle")),
        text_field(entry.get("sectionName")),
        description,
        published_at,
        text_field(entry.get("webUrl")),
    )
}

/// Read a JSON value as text.
///
/// Strings are taken as-is and other scalars in their JSON spelling.
/// Null, objects, arrays and absence all read as `""`.
fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Turn `2017-07-14T10:23:09Z` into `2017-07-14 10:23`.
///
/// `T` becomes a space, `Z` is removed and the last three characters
/// (`:ss`) are dropped. Input too short to hold seconds yields `""`.
pub fn format_publication_date(raw: &str) -> String {
    let stripped = raw.replace('T', " ").replace('Z', "");
    let keep = stripped.chars().count().saturating_sub(3);
    stripped.chars().take(keep).collect()
}
