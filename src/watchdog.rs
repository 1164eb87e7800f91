//! # Job Queue Watchdog
//!
//! Polls the remote queue for pending print jobs and feeds them to the
//! printer, forever. Each job is printed inside a scoped session, so the
//! paper always ends at a fresh page top even when a job fails partway.
//!
//! Per-iteration errors (queue unreachable, bad payload, device gone) are
//! logged and swallowed: the watchdog's contract is to keep polling.

use std::time::Duration;

use tracing::{error, info};

use crate::error::MicrolineError;
use crate::job::{HttpJobSource, JobSource};
use crate::printer::Printer;
use crate::transport::{DeviceTransport, EmulatorSink};

/// Default seconds between queue polls.
pub const DEFAULT_INTERVAL_SECS: u64 = 15;

/// Watchdog settings, assembled from CLI flags.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Base URL of the queue server, e.g. `https://golem.example.com`
    pub server_url: String,
    /// Time between polls
    pub interval: Duration,
    /// Print to the in-memory emulator instead of hardware
    pub emulate: bool,
    /// Printer device path (ignored when emulating)
    pub device: String,
}

/// Poll the queue at a fixed interval, printing one job per pickup.
///
/// Never returns under normal operation.
pub async fn watchdog_loop(config: WatchdogConfig) -> Result<(), MicrolineError> {
    info!(
        server = %config.server_url,
        interval_secs = config.interval.as_secs(),
        emulate = config.emulate,
        "watchdog started"
    );

    let mut source = HttpJobSource::new(&config.server_url);
    loop {
        if let Err(e) = process_next(&mut source, &config).await {
            error!(error = %e, "watchdog iteration failed");
        }
        tokio::time::sleep(config.interval).await;
    }
}

/// Fetch and print the next pending job, if any. Returns whether a job
/// was printed.
pub async fn process_next<J: JobSource>(
    source: &mut J,
    config: &WatchdogConfig,
) -> Result<bool, MicrolineError> {
    let Some(job) = source.next_job().await? else {
        return Ok(false);
    };

    if config.emulate {
        let (_, sink) = Printer::with_session(EmulatorSink::new(), |printer| {
            printer.print_job(&job)
        })?;
        // Dry runs show what would have hit the paper
        print!("{}", sink.printed_text());
    } else {
        let sink = DeviceTransport::open(&config.device)?;
        Printer::with_session(sink, |printer| printer.print_job(&job))?;
    }

    info!(job = %job.name, "job printed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::PrintJob;
    use async_trait::async_trait;

    struct StubSource {
        jobs: Vec<PrintJob>,
    }

    #[async_trait]
    impl JobSource for StubSource {
        async fn next_job(&mut self) -> Result<Option<PrintJob>, MicrolineError> {
            Ok(self.jobs.pop())
        }
    }

    fn emulate_config() -> WatchdogConfig {
        WatchdogConfig {
            server_url: "http://localhost:0".to_string(),
            interval: Duration::from_secs(1),
            emulate: true,
            device: "/dev/null".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_queue_prints_nothing() {
        let mut source = StubSource { jobs: vec![] };
        let printed = process_next(&mut source, &emulate_config()).await.unwrap();
        assert!(!printed);
    }

    #[tokio::test]
    async fn test_pending_job_is_printed() {
        let mut source = StubSource {
            jobs: vec![PrintJob {
                name: "test job".to_string(),
                blocks: vec!["hello".to_string()],
            }],
        };
        let printed = process_next(&mut source, &emulate_config()).await.unwrap();
        assert!(printed);
        // Queue drained
        let printed = process_next(&mut source, &emulate_config()).await.unwrap();
        assert!(!printed);
    }
}
