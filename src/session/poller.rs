//! Background refresh of the session.
//!
//! The poller asks for the auth status right away and then on a fixed
//! interval, publishing each outcome through a `watch` channel. It is the
//! only way the session is refreshed; nothing pushes invalidations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::{AuthStatus, SessionState};
use crate::client::ClientError;

/// Anything that can answer "who is signed in".
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<AuthStatus, ClientError>;
}

/// Shortest gap between two status polls.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Latest poll outcome plus the last answer that succeeded.
#[derive(Debug, Clone, Default)]
pub struct PollSnapshot {
    pub state: SessionState,
    pub last_success: Option<AuthStatus>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub polls: u64,
}

impl PollSnapshot {
    fn apply(&mut self, result: Result<AuthStatus, ClientError>) {
        self.polls += 1;
        match &result {
            Ok(status) => {
                self.last_success = Some(status.clone());
                self.refreshed_at = Some(Utc::now());
            }
            Err(e) => tracing::warn!("Auth status poll failed: {}", e),
        }
        self.state = SessionState::from_result(result);
    }
}

/// Handle to the polling task. Dropping it stops the polling.
pub struct AuthPoller {
    snapshot: watch::Receiver<PollSnapshot>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AuthPoller {
    /// Start polling `source` every `interval`; the first poll fires immediately.
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn spawn(source: Arc<dyn StatusSource>, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!("Poll interval {:?} raised to {:?}", interval, MIN_POLL_INTERVAL);
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (tx, rx) = watch::channel(PollSnapshot::default());
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A slow status call must not be followed by a burst of catch-up polls
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    result = source.fetch_status() => result,
                };

                tx.send_modify(|snapshot| snapshot.apply(result));
            }

            tracing::debug!("Auth status poller stopped");
        });

        Self {
            snapshot: rx,
            cancel,
            task: Some(task),
        }
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot.borrow().state.clone()
    }

    /// Receiver that wakes on every completed poll.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.snapshot.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancel the task and wait for it to wind down.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Auth status poller panicked: {}", e);
            }
        }
    }
}

impl Drop for AuthPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
