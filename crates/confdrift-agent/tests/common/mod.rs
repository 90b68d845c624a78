//! Scripted in-memory transport shared by the sender and agent tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use confdrift_agent::{SnapshotPayload, SnapshotTransport};
use confdrift_core::errors::TransportError;

#[derive(Clone, Default)]
pub struct FakeTransport {
    pub calls: Arc<Mutex<Vec<SnapshotPayload>>>,
    script: Arc<Mutex<VecDeque<Result<(), TransportError>>>>,
}

impl FakeTransport {
    /// Replies in order; succeeds once the script is exhausted.
    pub fn scripted(replies: Vec<Result<(), TransportError>>) -> Self {
        Self {
            calls: Arc::default(),
            script: Arc::new(Mutex::new(replies.into())),
        }
    }

    pub fn failing_with(error: TransportError, times: usize) -> Self {
        Self::scripted((0..times).map(|_| Err(error.clone())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SnapshotTransport for FakeTransport {
    fn post_snapshot(&self, payload: &SnapshotPayload) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(payload.clone());
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

pub fn network_error() -> TransportError {
    TransportError::Network {
        reason: "connection refused".to_string(),
    }
}
