//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::AmplifyEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn AmplifyEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn AmplifyEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler does not prevent later handlers from running.
    fn emit<F: Fn(&dyn AmplifyEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked, continuing");
            }
        }
    }

    pub fn emit_suite_started(&self, event: &SuiteStartedEvent) {
        self.emit(|h| h.on_suite_started(event));
    }

    pub fn emit_seed_excluded(&self, event: &SeedExcludedEvent) {
        self.emit(|h| h.on_seed_excluded(event));
    }

    pub fn emit_iteration_skipped(&self, event: &IterationSkippedEvent) {
        self.emit(|h| h.on_iteration_skipped(event));
    }

    pub fn emit_tests_kept(&self, event: &TestsKeptEvent) {
        self.emit(|h| h.on_tests_kept(event));
    }

    pub fn emit_suite_complete(&self, event: &SuiteCompleteEvent) {
        self.emit(|h| h.on_suite_complete(event));
    }
}
