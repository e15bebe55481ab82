use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Outcome of one delivery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl DeliveryResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&mut self) {
        self.sent += 1;
    }

    /// Counts a failure and keeps the error with the address redacted.
    pub fn record_failure(&mut self, email: &str, error: impl Display) {
        self.failed += 1;
        self.errors.push(format!(
            "Failed to send to {}: {error}",
            redact_address(email)
        ));
    }

    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

/// First three characters of the address followed by `***`.
pub fn redact_address(email: &str) -> String {
    let visible: String = email.chars().take(3).collect();
    format!("{visible}***")
}
