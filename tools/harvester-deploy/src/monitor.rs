//! Deployment monitor
//!
//! Polls the server state at a fixed interval until the API reports `ok` or
//! the timeout elapses. Read errors are treated as transient: they are logged
//! and the loop sleeps and polls again. Only elapsed time ends the loop
//! without success.

use crate::inventory;
use ovh_client::OvhClientTrait;
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// State that ends monitoring successfully
pub const SUCCESS_STATE: &str = "ok";

/// Delay between two state reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Overall monitoring budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Overrides [`DEFAULT_TIMEOUT`], in seconds
pub const ENV_TIMEOUT_SECS: &str = "HARVESTER_MONITOR_TIMEOUT_SECS";

/// Overrides [`DEFAULT_POLL_INTERVAL`], in seconds
pub const ENV_POLL_INTERVAL_SECS: &str = "HARVESTER_POLL_INTERVAL_SECS";

/// Monitor timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Sleep between two state reads
    pub poll_interval: Duration,
    /// Monitoring stops once this much time has elapsed
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MonitorConfig {
    /// Defaults, overridden by the environment where set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by `lookup` where it yields a positive integer
    ///
    /// Invalid values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let seconds = |key: &str, default: Duration| match lookup(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("Ignoring invalid {}={:?}, using {}s", key, raw, default.as_secs());
                    default
                }
            },
        };

        Self {
            poll_interval: seconds(ENV_POLL_INTERVAL_SECS, DEFAULT_POLL_INTERVAL),
            timeout: seconds(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT),
        }
    }
}

/// How monitoring ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The server reported [`SUCCESS_STATE`]
    Healthy {
        /// State reads attempted, failed ones included
        polls: u32,
        /// Time from the first read to the successful one
        elapsed: Duration,
    },
    /// The timeout elapsed first
    TimedOut {
        /// State reads attempted, failed ones included
        polls: u32,
        /// Time when the timeout was noticed
        elapsed: Duration,
    },
}

impl MonitorOutcome {
    /// Whether the success state was observed
    pub fn is_healthy(&self) -> bool {
        matches!(self, MonitorOutcome::Healthy { .. })
    }

    /// Number of state reads attempted, failed ones included
    pub fn polls(&self) -> u32 {
        match self {
            MonitorOutcome::Healthy { polls, .. } | MonitorOutcome::TimedOut { polls, .. } => *polls,
        }
    }
}

/// Poll `server` until it reports `ok` or `config.timeout` elapses
///
/// Progress is written to `out`. Errors only come from writing to `out`.
pub async fn monitor_deployment<W: Write>(
    client: &dyn OvhClientTrait,
    server: &str,
    config: &MonitorConfig,
    out: &mut W,
) -> std::io::Result<MonitorOutcome> {
    writeln!(out, "👁️  Monitoring deployment progress for {}...", server)?;
    writeln!(out, "   This will take 15-45 minutes depending on network speed")?;
    writeln!(out, "   You can also monitor via OVH IPMI console")?;
    info!(
        "Monitoring {} every {}s for up to {}s",
        server,
        config.poll_interval.as_secs(),
        config.timeout.as_secs()
    );

    let start = Instant::now();
    let mut polls = 0;

    let outcome = loop {
        let elapsed = start.elapsed();
        if elapsed >= config.timeout {
            break MonitorOutcome::TimedOut { polls, elapsed };
        }

        polls += 1;
        match inventory::read_state(client, server).await {
            Ok(state) => {
                writeln!(out, "   [{:4}s] Server state: {}", elapsed.as_secs(), state)?;
                debug!("{} state after {}s: {}", server, elapsed.as_secs(), state);

                if state == SUCCESS_STATE {
                    writeln!(out, "✅ Server appears to be online")?;
                    break MonitorOutcome::Healthy { polls, elapsed };
                }
            }
            Err(e) => {
                warn!("Monitoring error for {}: {}", server, e);
                writeln!(out, "   ⚠️  Monitoring error: {}", e)?;
            }
        }

        tokio::time::sleep(config.poll_interval).await;
    };

    if let MonitorOutcome::TimedOut { elapsed, .. } = outcome {
        warn!("{} did not report {} within {}s", server, SUCCESS_STATE, elapsed.as_secs());
        writeln!(
            out,
            "⏱️  Server did not report '{}' within {}s",
            SUCCESS_STATE,
            config.timeout.as_secs()
        )?;
    }
    writeln!(out, "ℹ️  Monitoring completed. Check server accessibility manually.")?;

    Ok(outcome)
}
