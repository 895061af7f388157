use std::net::IpAddr;
use std::time::Duration;

use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts},
};

use super::{Lookup, ResolveError, Resolving};

/// How long a single query against the upstream may take.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolver pinned to one upstream DNS server.
///
/// Queries go to `server:53` directly instead of through the system resolver.
/// System resolvers cache negative lookups for a TTL, which would otherwise
/// force a caller to wait out a stale NXDOMAIN entry even after the record
/// becomes valid upstream. The resolver keeps no cache, does not consult the
/// hosts file, and does not retry a failed query.
#[derive(Clone)]
pub struct UpstreamResolver {
    resolver: TokioAsyncResolver,
}

impl UpstreamResolver {
    pub fn new(server: IpAddr) -> Self {
        let mut opts = ResolverOpts::default();
        opts.attempts = 1;
        opts.timeout = QUERY_TIMEOUT;
        opts.cache_size = 0;
        opts.use_hosts_file = false;

        let mut name_servers = NameServerConfigGroup::new();
        name_servers.push(NameServerConfig {
            socket_addr: (server, 53).into(),
            protocol: Protocol::Tcp, // TCP is more reliable then UDP for DNS queries
            tls_dns_name: None,
            trust_negative_responses: false,
            bind_addr: None,
        });

        let resolver_config = ResolverConfig::from_parts(None, vec![], name_servers);

        Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
        }
    }
}

impl Lookup for UpstreamResolver {
    fn lookup(&self, hostname: &str) -> Resolving {
        let resolver = self.resolver.clone();
        let hostname = hostname.to_string();
        Box::pin(async move {
            let lookup =
                resolver
                    .lookup_ip(hostname.as_str())
                    .await
                    .map_err(|source| ResolveError::Lookup {
                        hostname: hostname.clone(),
                        source,
                    })?;

            let addrs: Vec<IpAddr> = lookup.iter().collect();
            if addrs.is_empty() {
                return Err(ResolveError::EmptyAnswer { hostname });
            }
            Ok(addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn construction_accepts_any_upstream() {
        let _ = UpstreamResolver::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
        let _ = UpstreamResolver::new(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn empty_answer_names_the_hostname() {
        let err = ResolveError::EmptyAnswer {
            hostname: "echo.example.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "lookup host echo.example.com returned no addresses"
        );
    }
}
