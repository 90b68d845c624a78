//! Periodic collection on a background thread.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use confdrift_core::config::AgentConfig;
use confdrift_core::errors::ConfigError;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::collector::ConfigCollector;
use crate::sender::{
    HttpTransport, RetryPolicy, SendOutcome, SenderStats, SnapshotSender, SnapshotTransport,
};

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns a [`SnapshotSender`] and drives it on a schedule.
pub struct ConfigMonitorAgent {
    sender: Arc<SnapshotSender>,
    initial_delay: Duration,
    interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl ConfigMonitorAgent {
    /// Agent posting over HTTP to `config.server_url`.
    pub fn new(config: &AgentConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(
            config.effective_server_url(),
            config.effective_request_timeout(),
        )
        .map_err(|e| ConfigError::InvalidValue {
            field: "agent.server_url".to_string(),
            message: e.to_string(),
        })?;
        Self::with_transport(config, Box::new(transport))
    }

    /// Agent delivering through an arbitrary transport.
    pub fn with_transport(
        config: &AgentConfig,
        transport: Box<dyn SnapshotTransport>,
    ) -> Result<Self, ConfigError> {
        let application_name = config
            .application_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfigError::ValidationFailed {
                field: "agent.application_name".to_string(),
                message: "required".to_string(),
            })?;

        let sender = SnapshotSender::new(
            ConfigCollector::from_config(config)?,
            transport,
            application_name,
            config.effective_environment(),
        )
        .with_retry(RetryPolicy::from_config(config))
        .enabled(config.is_enabled());

        Ok(Self {
            sender: Arc::new(sender),
            initial_delay: config.effective_initial_delay(),
            interval: config.effective_collection_interval(),
            worker: Mutex::new(None),
        })
    }

    /// Start the background thread. Returns whether the agent is running
    /// afterwards; a disabled agent never runs.
    pub fn start(&self) -> bool {
        if !self.sender.is_enabled() {
            tracing::info!("agent: disabled, not starting");
            return false;
        }
        let mut worker = self.lock_worker();
        if worker.is_some() {
            return true;
        }

        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let sender = Arc::clone(&self.sender);
        let (initial_delay, interval) = (self.initial_delay, self.interval);
        let spawned = thread::Builder::new()
            .name("confdrift-agent".to_string())
            .spawn(move || {
                if stop_requested(&stop_rx, initial_delay) {
                    return;
                }
                loop {
                    sender.send();
                    if stop_requested(&stop_rx, interval) {
                        break;
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                tracing::info!(
                    initial_delay_ms = initial_delay.as_millis() as u64,
                    interval_ms = interval.as_millis() as u64,
                    "agent: started"
                );
                *worker = Some(Worker { stop_tx, handle });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "agent: could not spawn collection thread");
                false
            }
        }
    }

    /// Signal the background thread and wait for it. No-op when not running.
    pub fn stop(&self) {
        let Some(worker) = self.lock_worker().take() else {
            return;
        };
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            tracing::warn!("agent: collection thread panicked");
        }
        tracing::info!("agent: stopped");
    }

    pub fn is_running(&self) -> bool {
        self.lock_worker().is_some()
    }

    /// Collect and deliver immediately, outside the schedule.
    pub fn send_snapshot(&self) -> SendOutcome {
        self.sender.send()
    }

    pub fn stats(&self) -> SenderStats {
        self.sender.stats()
    }

    fn lock_worker(&self) -> std::sync::MutexGuard<'_, Option<Worker>> {
        match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for ConfigMonitorAgent {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wait up to `timeout`; true when a stop was signalled or the agent is gone.
fn stop_requested(rx: &Receiver<()>, timeout: Duration) -> bool {
    !matches!(rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
}
