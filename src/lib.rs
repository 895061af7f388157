//! dnswait waits for a freshly created DNS name to propagate and for the
//! HTTP endpoint behind it to come up.
//!
//! The library exposes a single entry point, [`ReadinessProbe::await_ready`],
//! which polls an explicitly chosen upstream DNS server (bypassing any local
//! resolver cache) and, once the name resolves, issues a plain HTTP GET until
//! the endpoint answers 200 or the deadline passes.

pub mod config;
pub mod readiness;
pub mod resolver;

pub use readiness::outcome::{ProbeError, ProbeOutcome};
pub use readiness::probe::ReadinessProbe;
pub use readiness::request::{ProbeRequest, RequestError};
pub use resolver::{Lookup, ResolveError, Resolving, UpstreamResolver};
