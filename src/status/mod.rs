//! Status reporting for long-running steps
//!
//! A [`StatusReporter`] shows human-facing progress. Actions never call
//! [`StatusReporter::end`] themselves; they open a [`StatusScope`], which
//! ends the step exactly once when it is dropped. The scope reports failure
//! unless [`StatusScope::succeed`] was called, so early returns and `?`
//! propagation are always reported as failed steps.

use std::sync::Mutex;
use tracing::{info, warn};

/// Progress reporter with start/end semantics
pub trait StatusReporter: Send + Sync {
    /// A logical step has started
    fn start(&self, label: &str);

    /// The step started last has finished
    fn end(&self, success: bool);
}

/// Open reporting scope; ends the step when dropped
#[must_use = "dropping the scope immediately ends the step as failed"]
pub struct StatusScope<'a> {
    reporter: &'a dyn StatusReporter,
    success: bool,
}

impl<'a> StatusScope<'a> {
    /// Start `label` on `reporter`
    pub fn start(reporter: &'a dyn StatusReporter, label: &str) -> Self {
        reporter.start(label);
        Self {
            reporter,
            success: false,
        }
    }

    /// End the step as successful
    pub fn succeed(mut self) {
        self.success = true;
    }
}

impl Drop for StatusScope<'_> {
    fn drop(&mut self) {
        self.reporter.end(self.success);
    }
}

/// Reporter that only emits tracing events
///
/// Used where nobody watches a terminal, e.g. inside the server.
#[derive(Debug, Default)]
pub struct LogStatus {
    current: Mutex<Option<String>>,
}

impl LogStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusReporter for LogStatus {
    fn start(&self, label: &str) {
        info!("{} ...", label);
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(label.to_string());
    }

    fn end(&self, success: bool) {
        let label = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .unwrap_or_default();
        if success {
            info!("{} done", label);
        } else {
            warn!("{} failed", label);
        }
    }
}
