//! Placement diagnostics collected during a layout pass.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One diagnostic, keyed by the notation that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub index: usize,
    pub severity: Severity,
    pub message: String,
}

impl Log {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Ordered sink for [`Log`] entries. Entries are mirrored to the `log`
/// facade as they arrive.
#[derive(Debug, Default)]
pub(super) struct Diagnostics {
    logs: Vec<Log>,
}

impl Diagnostics {
    pub(super) fn error(&mut self, index: usize, message: impl Into<String>) {
        let message = message.into();
        log::error!("notation {index}: {message}");
        self.logs.push(Log { index, severity: Severity::Error, message });
    }

    pub(super) fn warning(&mut self, index: usize, message: impl Into<String>) {
        let message = message.into();
        log::warn!("notation {index}: {message}");
        self.logs.push(Log { index, severity: Severity::Warning, message });
    }

    #[cfg(test)]
    pub(super) fn logs(&self) -> &[Log] {
        &self.logs
    }

    pub(super) fn into_logs(self) -> Vec<Log> {
        self.logs
    }
}
