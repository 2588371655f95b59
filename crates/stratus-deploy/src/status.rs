//! Human-readable progress updates.
//!
//! The pipeline shows these messages to operators while the operation runs.
//! They carry no behavioural contract.

use std::sync::Mutex;

use tracing::info;

/// Phase name reported with every update.
pub const PHASE: &str = "CREATE_ECS_SERVER_GROUP";

/// Receives progress messages.
pub trait StatusSink: Send + Sync {
    /// Record a progress message for a phase.
    fn update(&self, phase: &str, message: &str);
}

/// Forwards progress messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn update(&self, phase: &str, message: &str) {
        info!(phase = %phase, "{message}");
    }
}

/// Keeps every progress message in memory.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    messages: Mutex<Vec<String>>,
}

impl RecordingStatus {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl StatusSink for RecordingStatus {
    fn update(&self, _phase: &str, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_owned());
        }
    }
}
