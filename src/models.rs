//! Data models for search requests and the articles they return.
//!
//! - [`ArticleRecord`]: one normalized search result
//! - [`SearchRequest`]: everything needed to build a search URL
//! - [`SearchResults`]: a snapshot of one search, as written to JSON

use serde::{Deserialize, Serialize};

/// One news article as extracted from a search result entry.
///
/// Every field is a plain `String`. A field missing from the provider's
/// response is stored as `""`, so rendering never has to handle absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    title: String,
    section: String,
    description: String,
    published_at: String,
    url: String,
}

impl ArticleRecord {
    pub fn new(
        title: impl Into<String>,
        section: impl Into<String>,
        description: impl Into<String>,
        published_at: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            section: section.into(),
            description: description.into(),
            published_at: published_at.into(),
            url: url.into(),
        }
    }

    /// The article headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The section name, e.g. "Football".
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Trail text of the article. May contain HTML markup.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Publication time trimmed to minute precision, e.g. `2017-07-14 10:23`.
    pub fn published_at(&self) -> &str {
        &self.published_at
    }

    /// Absolute link to the full article.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Parameters of a single search.
///
/// Built fresh for every search from the current preferences and the user's
/// query; nothing here is shared between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query. `None` or blank means "latest articles".
    pub query: Option<String>,
    /// Requested number of results, passed through unvalidated.
    pub page_size: String,
    /// Sort key such as `newest`, `oldest` or `relevance`.
    pub order_by: String,
    /// Section filter, e.g. `sport`.
    pub section: String,
    /// Extra fields to request; `trailText` provides the description.
    pub show_fields: String,
    /// API credential.
    pub api_key: String,
}

/// The articles of one search together with when and what was searched.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchResults {
    /// The normalized query, if any.
    pub query: Option<String>,
    /// Local date of the search in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Local time of the search.
    pub local_time: String,
    /// The articles, in the order the provider returned them.
    pub articles: Vec<ArticleRecord>,
}
