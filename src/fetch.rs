//! HTTP retrieval of search result bodies.
//!
//! [`HttpFetcher`] performs exactly one GET per call with fixed connect and
//! read timeouts. It never retries: a failed attempt is returned as a
//! [`FetchError`] and the caller decides what to do with it.
//!
//! The [`BodySource`] trait is the seam between the orchestrator and the
//! network, so the pipeline can also run against canned bodies.

use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument};
use url::Url;

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
/// Default time allowed between reads of the response.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport timeouts for [`HttpFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Why a fetch produced no body.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed; no request was made.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The server answered with something other than 200 OK.
    #[error("unexpected response status {0}")]
    Status(StatusCode),

    /// DNS, connect, timeout or connection reset.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Something that can turn a URL into a response body.
pub trait BodySource {
    /// Fetch the body behind `url` as text.
    fn fetch_body(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Single-attempt HTTP GET client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given timeouts.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl BodySource for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| {
            error!(error = %source, "Error creating URL");
            FetchError::InvalidUrl {
                url: url.to_string(),
                source,
            }
        })?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            error!(error = %e, "Problem making the HTTP request");
            FetchError::Transport(e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(%status, "Error response code");
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(error = %e, "Problem reading the response body");
            FetchError::Transport(e)
        })?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        info!(bytes = body.len(), "Fetched search response");
        Ok(body)
    }
}
