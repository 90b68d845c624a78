//! Snapshot delivery: payload, transport, bounded retry, statistics.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use confdrift_core::config::AgentConfig;
use confdrift_core::constants::SNAPSHOT_ENDPOINT;
use confdrift_core::errors::TransportError;
use confdrift_core::ConfigMap;
use serde::Serialize;

use crate::collector::{self, ConfigCollector};

/// Body posted to the monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub application_name: String,
    pub environment: String,
    pub config: ConfigMap,
    pub source_stats: BTreeMap<String, u64>,
}

/// Delivers one payload, one attempt. Retries are the sender's business.
pub trait SnapshotTransport: Send + Sync {
    fn post_snapshot(&self, payload: &SnapshotPayload) -> Result<(), TransportError>;
}

/// Blocking JSON-over-HTTP transport.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| TransportError::Network {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            url: format!("{}{}", server_url.trim_end_matches('/'), SNAPSHOT_ENDPOINT),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotTransport for HttpTransport {
    fn post_snapshot(&self, payload: &SnapshotPayload) -> Result<(), TransportError> {
        let resp = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .map_err(|e| {
                if e.is_builder() || e.is_body() {
                    TransportError::Serialization {
                        message: e.to_string(),
                    }
                } else {
                    TransportError::Network {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().unwrap_or_default();
        Err(TransportError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

/// Exponential backoff: `max_retries` extra attempts, delay doubling from
/// `initial_backoff` up to `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            max_retries: config.effective_max_retries(),
            initial_backoff: config.effective_initial_backoff(),
            max_backoff: config.effective_max_backoff(),
        }
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out.
    pub fn run<F>(&self, mut op: F) -> Result<(), TransportError>
    where
        F: FnMut() -> Result<(), TransportError>,
    {
        let mut backoff = self.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "agent: retry attempt {}/{} after {:?}",
                    attempt,
                    self.max_retries,
                    backoff
                );
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(self.max_backoff);
            }

            match op() {
                Ok(()) => return Ok(()),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => last_err = e.to_string(),
            }
        }

        Err(TransportError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error: last_err,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

/// Delivery counters. Copied out by [`SnapshotSender::stats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderStats {
    pub success_count: u64,
    pub failure_count: u64,
    pub last_success_time: Option<DateTime<Utc>>,
    pub last_failure_time: Option<DateTime<Utc>>,
}

/// What a call to [`SnapshotSender::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Sender disabled or nothing collected.
    Skipped,
    Delivered,
    Failed,
}

/// Collects, packages and delivers snapshots.
pub struct SnapshotSender {
    collector: ConfigCollector,
    transport: Box<dyn SnapshotTransport>,
    application_name: String,
    environment: String,
    enabled: bool,
    retry: RetryPolicy,
    stats: Mutex<SenderStats>,
}

impl SnapshotSender {
    pub fn new(
        collector: ConfigCollector,
        transport: Box<dyn SnapshotTransport>,
        application_name: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            collector,
            transport,
            application_name: application_name.into(),
            environment: environment.into(),
            enabled: true,
            retry: RetryPolicy::default(),
            stats: Mutex::new(SenderStats::default()),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Payload for the current process state, or `None` when nothing was
    /// collected.
    pub fn build_payload(&self) -> Option<SnapshotPayload> {
        let entries = self.collector.collect_runtime_config();
        if entries.is_empty() {
            return None;
        }
        Some(SnapshotPayload {
            application_name: self.application_name.clone(),
            environment: self.environment.clone(),
            config: collector::to_simple_map(&entries),
            source_stats: collector::source_stats(&entries),
        })
    }

    /// Collect and deliver one snapshot. Failures are logged and counted,
    /// never returned.
    pub fn send(&self) -> SendOutcome {
        if !self.enabled {
            return SendOutcome::Skipped;
        }
        let Some(payload) = self.build_payload() else {
            tracing::debug!("agent: nothing collected, skipping snapshot");
            return SendOutcome::Skipped;
        };

        let result = self.retry.run(|| self.transport.post_snapshot(&payload));
        let now = Utc::now();
        let mut stats = match self.stats.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match result {
            Ok(()) => {
                stats.success_count += 1;
                stats.last_success_time = Some(now);
                tracing::debug!(
                    application = %self.application_name,
                    keys = payload.config.len(),
                    "agent: snapshot delivered"
                );
                SendOutcome::Delivered
            }
            Err(e) => {
                stats.failure_count += 1;
                stats.last_failure_time = Some(now);
                tracing::warn!(
                    application = %self.application_name,
                    error = %e,
                    "agent: snapshot delivery failed"
                );
                SendOutcome::Failed
            }
        }
    }

    pub fn stats(&self) -> SenderStats {
        match self.stats.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
