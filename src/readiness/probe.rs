use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use super::outcome::{ProbeError, ProbeOutcome};
use super::request::ProbeRequest;
use crate::resolver::Lookup;

/// Pause between attempts, applied before the first one as well.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls until a hostname resolves and its endpoint answers 200, or the
/// request's deadline passes.
///
/// The probe is stateless across runs and safe to share between concurrent
/// invocations; each run keeps its own deadline and error bookkeeping.
pub struct ReadinessProbe {
    resolver: Arc<dyn Lookup>,
    client: reqwest::Client,
    poll_interval: Duration,
}

impl ReadinessProbe {
    /// Creates a probe using the given resolution strategy and a default
    /// HTTP client. The client carries no per-request timeout; only the
    /// request's deadline bounds an iteration.
    pub fn new(resolver: Arc<dyn Lookup>) -> Self {
        Self {
            resolver,
            client: reqwest::Client::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Runs the readiness loop until `Ready` or deadline exhaustion.
    pub async fn await_ready(&self, request: &ProbeRequest) -> ProbeOutcome {
        self.await_ready_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`await_ready`](Self::await_ready), but additionally stops at the
    /// top of the next iteration once `cancel` is triggered. A cancelled run
    /// reports the same `Failed` shape as deadline exhaustion.
    pub async fn await_ready_with_cancel(
        &self,
        request: &ProbeRequest,
        cancel: &CancellationToken,
    ) -> ProbeOutcome {
        let deadline = Instant::now() + request.timeout();
        let mut attempts: u32 = 0;
        let mut last_error: Option<ProbeError> = None;

        while Instant::now() < deadline && !cancel.is_cancelled() {
            sleep(self.poll_interval).await;
            attempts += 1;

            let addrs = match self.resolver.lookup(request.hostname()).await {
                Ok(addrs) => addrs,
                Err(err) => {
                    log::debug!("attempt {attempts}: {err}");
                    last_error = Some(ProbeError::Resolution(err));
                    continue;
                }
            };
            log::debug!(
                "attempt {attempts}: {} resolved to {} address(es)",
                request.hostname(),
                addrs.len()
            );

            let response = match self.client.get(request.url().clone()).send().await {
                Ok(response) => response,
                Err(err) => {
                    log::debug!("attempt {attempts}: GET {} failed: {err}", request.url());
                    last_error = Some(ProbeError::Connection(err));
                    continue;
                }
            };

            let status = response.status();
            // The body is never read; dropping the response returns the
            // connection before the verdict.
            drop(response);

            if status == StatusCode::OK {
                return ProbeOutcome::Ready;
            }
            last_error = Some(ProbeError::UnexpectedStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        ProbeOutcome::Failed {
            last_error: last_error.unwrap_or(ProbeError::DeadlineExceeded),
            attempts,
        }
    }
}
