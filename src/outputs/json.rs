//! JSON snapshots of search results.
//!
//! Files are organized by date and named after the query:
//! ```text
//! json_output_dir/
//! └── 2017-07-14/
//!     ├── latest.json      # search without a query
//!     └── wimbledon.json
//! ```

use crate::models::SearchResults;
use crate::utils::slugify_title;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// File stem used when the search had no query.
const NO_QUERY_STEM: &str = "latest";

/// Path of the snapshot file for `results` under `json_output_dir`.
pub fn results_path(results: &SearchResults, json_output_dir: &str) -> String {
    let stem = results
        .query
        .as_deref()
        .map(slugify_title)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_QUERY_STEM.to_string());
    format!(
        "{}/{}/{}.json",
        json_output_dir.trim_end_matches('/'),
        results.local_date,
        stem
    )
}

/// Write `results` as pretty JSON, creating the date directory if needed.
///
/// # Arguments
///
/// * `results` - The snapshot to serialize
/// * `json_output_dir` - Root directory; files land in `<dir>/<local_date>/`
///
/// # Returns
///
/// The path written, or the serialization or I/O error.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_results(
    results: &SearchResults,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(results)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        results.local_date
    );
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = results_path(results, json_output_dir);
    fs::write(&path, json).await?;
    info!(%path, count = results.articles.len(), "Wrote search results JSON");
    Ok(path)
}
