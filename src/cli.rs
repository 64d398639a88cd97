//! Command-line interface definitions.
//!
//! Flags override the matching keys of the preferences file.

use crate::config::Preferences;
use clap::Parser;

/// Search Guardian sport news from the terminal.
///
/// # Examples
///
/// ```sh
/// # Latest articles with default preferences
/// guardian_news
///
/// # One search, twenty results, most relevant first
/// guardian_news -q "world cup" -n 20 -o relevance
///
/// # Read queries from stdin; each new line replaces the previous search
/// guardian_news --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Free-text query; spaces are removed before searching
    #[arg(short, long)]
    pub query: Option<String>,

    /// Number of results to request
    #[arg(short = 'n', long)]
    pub page_size: Option<String>,

    /// Sort order: newest, oldest or relevance
    #[arg(short, long)]
    pub order_by: Option<String>,

    /// Section to search in
    #[arg(long)]
    pub section: Option<String>,

    /// Guardian content API key
    #[arg(long, env = "GUARDIAN_API_KEY")]
    pub api_key: Option<String>,

    /// Optional path to a preferences YAML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory to write a JSON snapshot of the results into
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Read queries from stdin, one per line
    #[arg(short, long)]
    pub interactive: bool,

    /// Search even if the endpoint does not look reachable
    #[arg(long)]
    pub skip_connectivity_check: bool,
}

impl Cli {
    /// Overlay the flags that were given on top of `prefs`.
    pub fn apply_to(&self, mut prefs: Preferences) -> Preferences {
        if let Some(page_size) = &self.page_size {
            prefs.page_size = page_size.clone();
        }
        if let Some(order_by) = &self.order_by {
            prefs.order_by = order_by.clone();
        }
        if let Some(section) = &self.section {
            prefs.section = section.clone();
        }
        if let Some(api_key) = &self.api_key {
            prefs.api_key = api_key.clone();
        }
        prefs
    }
}
