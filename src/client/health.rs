//! Backend health polling

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::api::{BackendClient, ClientError, HealthStatusBody};

const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Why the last health check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthFailure {
    /// The backend answered with a non-OK status
    NotResponding,
    /// The request never got an answer
    Unreachable,
}

/// What the health indicator shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthIndicator {
    Checking,
    Healthy { timestamp: String },
    Error(HealthFailure),
}

impl HealthIndicator {
    fn from_result(result: Result<HealthStatusBody, ClientError>) -> Self {
        match result {
            Ok(body) => Self::Healthy {
                timestamp: body.timestamp,
            },
            Err(ClientError::Status(_)) => Self::Error(HealthFailure::NotResponding),
            Err(ClientError::Network(_) | ClientError::Decode(_)) => {
                Self::Error(HealthFailure::Unreachable)
            }
        }
    }
}

impl fmt::Display for HealthIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking..."),
            Self::Healthy { timestamp } => write!(f, "Backend is healthy - {}", timestamp),
            Self::Error(HealthFailure::NotResponding) => write!(f, "Backend is not responding"),
            Self::Error(HealthFailure::Unreachable) => write!(f, "Failed to connect to backend"),
        }
    }
}

/// Scheduled health check
///
/// The first check runs as soon as the task starts, then once per interval.
/// Polling ends on [`HealthMonitor::stop`] or when the monitor is dropped.
#[derive(Debug)]
pub struct HealthMonitor {
    state: watch::Receiver<HealthIndicator>,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    /// Spawn the polling task on the current runtime
    pub fn start(client: Arc<dyn BackendClient>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(HealthIndicator::Checking);
        let period = interval.max(MIN_POLL_INTERVAL);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let indicator = HealthIndicator::from_result(client.health().await);
                debug!(health = %indicator, "Health check completed");

                if tx.send(indicator).is_err() {
                    break;
                }
            }
        });

        Self {
            state: rx,
            handle: Some(handle),
        }
    }

    /// Latest indicator
    pub fn current(&self) -> HealthIndicator {
        self.state.borrow().clone()
    }

    /// Receiver notified on every completed check
    pub fn subscribe(&self) -> watch::Receiver<HealthIndicator> {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel polling; idempotent
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Health monitor stopped");
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
