//! Network reachability check performed before a search is started.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};
use url::{Host, Url};

/// Shown instead of results when the network is unreachable.
pub const NO_CONNECTION_MESSAGE: &str = "No internet connection.";

/// Whether the host behind `endpoint` can be reached right now.
///
/// # Arguments
///
/// * `endpoint` - The search endpoint URL; only its host and port are used
/// * `limit` - Upper bound for resolving and connecting, taken together
///
/// # Returns
///
/// `true` once a TCP connection to any resolved address succeeds. Any
/// failure counts as "not connected", including an endpoint that is not a
/// URL and running out of time.
#[instrument(level = "info", skip_all, fields(%endpoint))]
pub async fn is_connected(endpoint: &str, limit: Duration) -> bool {
    let Some((host, port)) = host_and_port(endpoint) else {
        warn!("Endpoint has no host; treating as offline");
        return false;
    };

    let reach = async {
        let addrs = resolve(&host, port).await?;
        connect_any(&addrs).await
    };

    match timeout(limit, reach).await {
        Ok(Ok(addr)) => {
            debug!(%addr, "Endpoint reachable");
            true
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Endpoint unreachable");
            false
        }
        Err(_) => {
            warn!(?limit, "Connectivity check timed out");
            false
        }
    }
}

fn host_and_port(endpoint: &str) -> Option<(Host<String>, u16)> {
    let url = Url::parse(endpoint).ok()?;
    let host = url.host()?.to_owned();
    let port = url.port_or_known_default()?;
    Some((host, port))
}

/// IP literals are used as-is; domain names go through DNS.
async fn resolve(host: &Host<String>, port: u16) -> io::Result<Vec<SocketAddr>> {
    match host {
        Host::Ipv4(ip) => Ok(vec![SocketAddr::from((*ip, port))]),
        Host::Ipv6(ip) => Ok(vec![SocketAddr::from((*ip, port))]),
        Host::Domain(name) => Ok(lookup_host((name.as_str(), port)).await?.collect()),
    }
}

/// Try each address in turn; return the first that accepts a connection.
async fn connect_any(addrs: &[SocketAddr]) -> io::Result<SocketAddr> {
    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
    for &addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(_) => return Ok(addr),
            Err(e) => {
                debug!(%addr, error = %e, "Address unreachable; trying next");
                last_error = e;
            }
        }
    }
    Err(last_error)
}
