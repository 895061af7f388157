use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use dnswait::resolver::{Lookup, ResolveError, Resolving};
use dnswait::{ProbeError, ProbeOutcome, ProbeRequest, ReadinessProbe};

const GOOGLE_DNS: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));

/// Answers each request with the next status in `statuses`, repeating the
/// last one forever. One connection at a time, closed after every response.
async fn spawn_stub(statuses: Vec<u16>) -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicU32::new(0));
    let counter = served.clone();

    tokio::spawn(async move {
        let mut next = 0usize;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let status = statuses[next.min(statuses.len() - 1)];
            next += 1;

            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;

            let reason = match status {
                200 => "OK",
                503 => "Service Unavailable",
                _ => "Unknown",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
            let _ = socket.write_all(response.as_bytes()).await;
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    (addr, served)
}

/// Fails the first `failures` lookups, then answers with localhost.
struct ScriptedLookup {
    failures: u32,
    calls: AtomicU32,
}

impl ScriptedLookup {
    fn succeeding_after(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Lookup for ScriptedLookup {
    fn lookup(&self, hostname: &str) -> Resolving {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = call <= self.failures;
        let hostname = hostname.to_string();
        Box::pin(async move {
            if fail {
                Err(ResolveError::EmptyAnswer { hostname })
            } else {
                Ok(vec![IpAddr::V4(Ipv4Addr::LOCALHOST)])
            }
        })
    }
}

fn stub_request(addr: SocketAddr, timeout: Duration) -> ProbeRequest {
    ProbeRequest::new(format!("127.0.0.1:{}", addr.port()), GOOGLE_DNS, timeout)
        .expect("valid request")
}

#[tokio::test]
async fn ready_after_propagation_and_startup() {
    // Propagation takes three polls, then the endpoint needs one more poll
    // to come up: resolution fails 3 times, the first response is a 503,
    // the next a 200. Ready on the fifth iteration.
    let (addr, served) = spawn_stub(vec![503, 200]).await;
    let resolver = ScriptedLookup::succeeding_after(3);
    let probe =
        ReadinessProbe::new(resolver.clone()).with_poll_interval(Duration::from_millis(20));

    let outcome = probe
        .await_ready(&stub_request(addr, Duration::from_secs(10)))
        .await;

    assert!(outcome.is_ready(), "expected Ready, got {outcome:?}");
    assert_eq!(resolver.calls(), 5);
    assert_eq!(served.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn persistent_non_200_reports_unexpected_status() {
    let (addr, _served) = spawn_stub(vec![503]).await;
    let resolver = ScriptedLookup::succeeding_after(0);
    let probe =
        ReadinessProbe::new(resolver.clone()).with_poll_interval(Duration::from_millis(10));

    let outcome = probe
        .await_ready(&stub_request(addr, Duration::from_millis(300)))
        .await;

    match outcome {
        ProbeOutcome::Failed {
            last_error: last_error @ ProbeError::UnexpectedStatus { code: 503, .. },
            attempts,
        } => {
            assert!(attempts >= 1);
            assert_eq!(
                last_error.to_string(),
                "unexpected status code: 503 Service Unavailable"
            );
        }
        other => panic!("expected unexpected-status failure, got {other:?}"),
    }
}

#[tokio::test]
async fn ready_endpoint_reports_ready_twice() {
    let (addr, _served) = spawn_stub(vec![200]).await;
    let resolver = ScriptedLookup::succeeding_after(0);
    let probe =
        ReadinessProbe::new(resolver.clone()).with_poll_interval(Duration::from_millis(20));
    let request = stub_request(addr, Duration::from_secs(5));

    assert!(probe.await_ready(&request).await.is_ready());

    // Re-probing an already-ready endpoint succeeds on the first iteration.
    let started = Instant::now();
    assert!(probe.await_ready(&request).await.is_ready());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn long_probe_releases_connections_every_iteration() {
    // The stub serves one connection at a time and closes it after each
    // response, so the loop only keeps making progress if the client gives
    // up its connection on every iteration.
    let (addr, served) = spawn_stub(vec![503]).await;
    let resolver = ScriptedLookup::succeeding_after(0);
    let probe = ReadinessProbe::new(resolver.clone()).with_poll_interval(Duration::from_millis(5));

    let outcome = probe
        .await_ready(&stub_request(addr, Duration::from_millis(700)))
        .await;

    let ProbeOutcome::Failed { attempts, .. } = outcome else {
        panic!("expected failure against a 503-only endpoint");
    };
    assert!(attempts >= 40, "only {attempts} attempts completed");
    // The serving task counts slightly behind the client on the last
    // response, hence the off-by-one allowance.
    assert!(served.load(Ordering::SeqCst) + 1 >= resolver.calls());
}
