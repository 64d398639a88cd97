//! User preferences: endpoint, section filter, result count, sort order,
//! credential and timeouts.
//!
//! Preferences come from an optional YAML file. Any key the file leaves out
//! takes its default, so an empty file is valid:
//!
//! ```yaml
//! page_size: "20"
//! order_by: relevance
//! api_key: my-key
//! ```

use crate::fetch::FetchConfig;
use crate::models::SearchRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://content.guardianapis.com/search";
pub const DEFAULT_SECTION: &str = "sport";
pub const DEFAULT_SHOW_FIELDS: &str = "trailText";
pub const DEFAULT_PAGE_SIZE: &str = "10";
pub const DEFAULT_ORDER_BY: &str = "newest";
pub const DEFAULT_API_KEY: &str = "test";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read preferences file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid preferences file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Search preferences read before every search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Preferences {
    /// Search endpoint of the content API.
    pub endpoint: String,
    /// Section filter.
    pub section: String,
    /// Extra fields requested for each result.
    pub show_fields: String,
    /// Maximum number of results, as sent to the API.
    pub page_size: String,
    /// Sort order: `newest`, `oldest` or `relevance`.
    pub order_by: String,
    /// API credential.
    pub api_key: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            section: DEFAULT_SECTION.to_string(),
            show_fields: DEFAULT_SHOW_FIELDS.to_string(),
            page_size: DEFAULT_PAGE_SIZE.to_string(),
            order_by: DEFAULT_ORDER_BY.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            read_timeout_secs: fetch.read_timeout.as_secs(),
        }
    }
}

impl Preferences {
    /// Parse preferences from YAML text.
    pub fn from_yaml(text: &str, path: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document for a struct.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load preferences from `path`, or defaults when no path is given.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No preferences file given; using defaults");
            return Ok(Self::default());
        };
        let shown = path.display().to_string();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: shown.clone(),
                source,
            })?;
        let prefs = Self::from_yaml(&text, &shown)?;
        info!(path = %shown, page_size = %prefs.page_size, order_by = %prefs.order_by, "Loaded preferences");
        Ok(prefs)
    }

    /// Transport timeouts for the fetcher.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
        }
    }

    /// Bundle the current preferences with a query into a request.
    pub fn search_request(&self, query: Option<String>) -> SearchRequest {
        SearchRequest {
            query,
            page_size: self.page_size.clone(),
            order_by: self.order_by.clone(),
            section: self.section.clone(),
            show_fields: self.show_fields.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.endpoint, "https://content.guardianapis.com/search");
        assert_eq!(prefs.section, "sport");
        assert_eq!(prefs.show_fields, "trailText");
        assert_eq!(prefs.page_size, "10");
        assert_eq!(prefs.order_by, "newest");
        assert_eq!(prefs.api_key, "test");
        assert_eq!(prefs.connect_timeout_secs, 15);
        assert_eq!(prefs.read_timeout_secs, 10);
    }

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let prefs = Preferences::from_yaml("page_size: \"25\"\norder_by: relevance\n", "p.yaml").unwrap();
        assert_eq!(prefs.page_size, "25");
        assert_eq!(prefs.order_by, "relevance");
        assert_eq!(prefs.section, "sport");
        assert_eq!(prefs.api_key, "test");
    }

    #[test]
    fn test_empty_yaml_is_defaults() {
        assert_eq!(Preferences::from_yaml("", "p.yaml").unwrap(), Preferences::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Preferences::from_yaml("read_timeout_secs: soon", "p.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("p.yaml"));
    }

    #[test]
    fn test_search_request_and_fetch_config() {
        let prefs = Preferences {
            read_timeout_secs: 3,
            ..Preferences::default()
        };
        let request = prefs.search_request(Some("ashes".to_string()));
        assert_eq!(request.query.as_deref(), Some("ashes"));
        assert_eq!(request.page_size, "10");
        assert_eq!(request.section, "sport");
        assert_eq!(prefs.fetch_config().read_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_load_without_path() {
        assert_eq!(Preferences::load(None).await.unwrap(), Preferences::default());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("guardian_news_prefs_{}.yaml", std::process::id()));
        std::fs::write(&path, "order_by: oldest\nsection: football\n").unwrap();

        let prefs = Preferences::load(Some(path.as_path())).await.unwrap();
        assert_eq!(prefs.order_by, "oldest");
        assert_eq!(prefs.section, "football");
        assert_eq!(prefs.page_size, "10");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Preferences::load(Some(Path::new("/nonexistent/prefs.yaml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
