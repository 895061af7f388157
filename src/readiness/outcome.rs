use thiserror::Error;

use crate::resolver::ResolveError;

/// What went wrong in one iteration of the readiness loop.
///
/// Every variant is retryable while deadline budget remains; the loop never
/// distinguishes transient from permanent failures. That judgment belongs to
/// the caller, which knows whether the hostname was ever expected to exist.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// DNS query against the upstream failed.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// HTTP request could not be sent or no response was received.
    #[error(transparent)]
    Connection(#[from] reqwest::Error),

    /// A response arrived, but not with status 200.
    #[error("unexpected status code: {code} {reason}")]
    UnexpectedStatus { code: u16, reason: String },

    /// The deadline passed before any attempt could be made.
    #[error("deadline exceeded, no successful attempt")]
    DeadlineExceeded,
}

/// Terminal result of one probe run.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The hostname resolved and the endpoint answered 200 in the same
    /// iteration.
    Ready,
    /// The deadline passed (or the probe was cancelled) without a ready
    /// endpoint.
    Failed {
        last_error: ProbeError,
        attempts: u32,
    },
}

impl ProbeOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProbeOutcome::Ready)
    }
}
