//! Helpers shared by the unit tests: a one-shot HTTP server and canned
//! body sources.

use crate::fetch::{BodySource, FetchError};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve a single HTTP response on a random local port.
///
/// The server reads the request head, waits `delay`, writes the response
/// and closes the connection. Returns the URL to request.
pub async fn serve_once(status_line: &str, body: &str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json; charset=utf-8\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        head.extend_from_slice(&buf[..n]);
                        if head.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}/search")
}

/// A local URL on which nothing is listening.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/search")
}

/// A [`BodySource`] that answers every URL the same way after a delay.
#[derive(Debug, Clone)]
pub enum Canned {
    Body(String, Duration),
    Status(StatusCode),
}

impl Canned {
    pub fn body(body: &str) -> Self {
        Canned::Body(body.to_string(), Duration::ZERO)
    }

    pub fn slow_body(body: &str, delay: Duration) -> Self {
        Canned::Body(body.to_string(), delay)
    }
}

impl BodySource for Canned {
    async fn fetch_body(&self, _url: &str) -> Result<String, FetchError> {
        match self {
            Canned::Body(body, delay) => {
                tokio::time::sleep(*delay).await;
                Ok(body.clone())
            }
            Canned::Status(status) => Err(FetchError::Status(*status)),
        }
    }
}

/// A [`BodySource`] whose answer depends on the requested URL.
///
/// URLs containing `slow` are answered after `delay`; everything else
/// immediately. The body is a one-result document titled after the URL's
/// `q` parameter.
#[derive(Debug, Clone)]
pub struct EchoQuery {
    pub delay: Duration,
}

impl BodySource for EchoQuery {
    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        if url.contains("slow") {
            tokio::time::sleep(self.delay).await;
        }
        let title = url::Url::parse(url)
            .ok()
            .and_then(|u| {
                u.query_pairs()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.into_owned())
            })
            .unwrap_or_default();
        Ok(serde_json::json!({
            "response": { "status": "ok", "results": [ { "webTitle": title } ] }
        })
        .to_string())
    }
}
