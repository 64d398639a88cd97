//! Search URL construction.
//!
//! Composes the Guardian `/search` request from an endpoint and a
//! [`SearchRequest`]. This is pure string composition: page size and sort
//! key are passed through as given, and a bad value only shows up later as
//! an empty result or a provider error.

use crate::models::SearchRequest;
use url::form_urlencoded;

/// Output format requested from the provider.
pub const RESPONSE_FORMAT: &str = "json";

/// Normalize a free-text query the way the search box does.
///
/// Surrounding whitespace is trimmed and internal spaces are removed.
/// Returns `None` when nothing is left.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_query(" world cup "), Some("worldcup".to_string()));
/// assert_eq!(normalize_query("   "), None);
/// ```
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim().replace(' ', "");
    if query.is_empty() { None } else { Some(query) }
}

/// Build the complete search URL.
///
/// Parameters are appended in a fixed order: `q` (only for a non-empty
/// query), `format`, `section`, `show-fields`, `page-size`, `order-by` and
/// `api-key`. Values are form-url-encoded. An endpoint that already ends in
/// `?` or carries its own query string is extended rather than given a
/// second `?`.
///
/// # Arguments
///
/// * `endpoint` - Base search URL, with or without a trailing `?`
/// * `request` - Query and preferences; the query is normalized again here
///
/// # Returns
///
/// The full request URL, ready for [`crate::fetch::BodySource::fetch_body`].
pub fn build_search_url(endpoint: &str, request: &SearchRequest) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());

    if let Some(query) = request.query.as_deref().and_then(normalize_query) {
        params.append_pair("q", &query);
    }
    params
        .append_pair("format", RESPONSE_FORMAT)
        .append_pair("section", &request.section)
        .append_pair("show-fields", &request.show_fields)
        .append_pair("page-size", &request.page_size)
        .append_pair("order-by", &request.order_by)
        .append_pair("api-key", &request.api_key);

    let base = endpoint.trim_end_matches(['?', '&']);
    let separator = if base.contains('?') { '&' } else { '?' };
    let url = format!("{base}{separator}{}", params.finish());
    tracing::debug!(%url, "Built search URL");
    url
}
