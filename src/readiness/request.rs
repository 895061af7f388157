use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("hostname must not be empty")]
    EmptyHostname,

    #[error("hostname {hostname} is not a valid domain name")]
    InvalidHostname { hostname: String },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// One readiness check: which name to wait for, which upstream DNS server to
/// ask, and how long to keep trying. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    hostname: String,
    url: Url,
    dns_server: IpAddr,
    timeout: Duration,
}

impl ProbeRequest {
    /// Validates the fields and derives the probe URL (`http://<hostname>`).
    pub fn new(
        hostname: impl Into<String>,
        dns_server: IpAddr,
        timeout: Duration,
    ) -> Result<Self, RequestError> {
        let hostname = hostname.into();
        if hostname.is_empty() {
            return Err(RequestError::EmptyHostname);
        }
        if timeout.is_zero() {
            return Err(RequestError::ZeroTimeout);
        }
        let url = Url::parse(&format!("http://{hostname}"))
            .map_err(|_| RequestError::InvalidHostname {
                hostname: hostname.clone(),
            })?;

        Ok(Self {
            hostname,
            url,
            dns_server,
            timeout,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Plain-HTTP URL probed once the hostname resolves.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn dns_server(&self) -> IpAddr {
        self.dns_server
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
