//! Detects embedded content load failures in the diagnostic stream

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;

use super::{DiagnosticObserver, DiagnosticRecord};

/// One-way error flag tripped by the first warning or error whose message
/// contains one of the configured patterns.
pub struct ErrorSniffer {
    patterns: Vec<String>,
    tripped: AtomicBool,
}

impl ErrorSniffer {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns,
            tripped: AtomicBool::new(false),
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    fn matches(&self, message: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && message.contains(pattern.as_str()))
    }
}

impl DiagnosticObserver for ErrorSniffer {
    fn observe(&self, record: &DiagnosticRecord) {
        // Level ordering in tracing puts ERROR below WARN.
        if record.level > Level::WARN || self.is_tripped() {
            return;
        }
        if self.matches(&record.message) {
            self.tripped.store(true, Ordering::Release);
        }
    }
}
