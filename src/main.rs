use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use dnswait::config::app_config::load_config;
use dnswait::readiness::report;
use dnswait::{ProbeOutcome, ProbeRequest, ReadinessProbe, UpstreamResolver};

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let app = load_config();
    let dns_server = app.config.dns_server;
    let poll_interval = Duration::from_secs(app.config.poll_interval_seconds);
    let max_host_width = app.max_host_width;

    // One resolver per upstream; probes are stateless and share it freely.
    let resolver = Arc::new(UpstreamResolver::new(dns_server));

    let mut handles: Vec<JoinHandle<bool>> = vec![];

    for target in app.config.targets {
        let resolver = resolver.clone();

        let handle = tokio::spawn(async move {
            let hostname = to_fixed_width(&target.hostname, max_host_width);
            let request = match ProbeRequest::new(
                target.hostname.clone(),
                dns_server,
                Duration::from_secs(target.timeout_seconds),
            ) {
                Ok(request) => request,
                Err(e) => {
                    println!("[{hostname}] ❌ Invalid target: {e}");
                    return false;
                }
            };

            let probe = ReadinessProbe::new(resolver).with_poll_interval(poll_interval);
            let started = Instant::now();

            match probe.await_ready(&request).await {
                ProbeOutcome::Ready => {
                    println!(
                        "[{hostname}] ✅ Ready, Elapsed: {:.1}s",
                        started.elapsed().as_secs_f64()
                    );
                    true
                }
                ProbeOutcome::Failed {
                    last_error,
                    attempts,
                } => {
                    println!(
                        "[{hostname}] ❌ Not ready after {attempts} attempt(s): {}",
                        report(&last_error)
                    );
                    false
                }
            }
        });

        handles.push(handle);
    }

    let mut all_ready = true;
    for handle in handles {
        all_ready &= handle.await.unwrap_or(false);
    }

    if !all_ready {
        std::process::exit(1);
    }
}
