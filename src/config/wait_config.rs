use std::net::{IpAddr, Ipv4Addr};

use serde::Deserialize;

/// Top-level configuration for the dnswait CLI.
/// Contains the upstream DNS server, the poll interval, and the list of
/// hostnames to wait for.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitConfig {
    /// The upstream DNS server queried directly on port 53, bypassing the
    /// system resolver and its negative cache.
    /// Defaults to 8.8.8.8 if not specified.
    #[serde(default = "default_dns_server")]
    pub dns_server: IpAddr,

    /// Seconds to wait between probe attempts.
    /// Defaults to 1 if not specified.
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,

    /// The hostnames whose readiness is awaited.
    pub targets: Vec<TargetConfig>,
}

/// One hostname to wait for.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Fully-qualified domain name assigned by the DNS record controller.
    pub hostname: String,

    /// Seconds until the probe for this hostname gives up.
    /// Defaults to 120 if not specified.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_dns_server() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))
}

fn default_poll_interval_seconds() -> u64 {
    1
}

fn default_timeout_seconds() -> u64 {
    120
}
