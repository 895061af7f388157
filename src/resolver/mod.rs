//! DNS resolution against an explicit upstream server.
//!
//! The [`Lookup`] trait is the seam between the readiness loop and the actual
//! resolver, so tests can script resolution outcomes and callers can swap in
//! their own strategy. [`UpstreamResolver`] is the production implementation.

pub mod upstream;

pub use upstream::UpstreamResolver;

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;

use thiserror::Error;

/// Future returned by a [`Lookup`] implementation.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Vec<IpAddr>, ResolveError>> + Send>>;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lookup host {hostname} failed: {source}")]
    Lookup {
        hostname: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },

    #[error("lookup host {hostname} returned no addresses")]
    EmptyAnswer { hostname: String },
}

/// Hostname-to-address resolution strategy.
///
/// A successful lookup yields a non-empty address set. Implementations do not
/// retry and do not cache; both are the caller's concern.
pub trait Lookup: Send + Sync {
    fn lookup(&self, hostname: &str) -> Resolving;
}
