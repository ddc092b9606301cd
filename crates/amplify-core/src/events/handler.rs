//! AmplifyEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing the amplification loop.
///
/// Handlers only override the events they care about.
pub trait AmplifyEventHandler: Send + Sync {
    fn on_suite_started(&self, _event: &SuiteStartedEvent) {}
    fn on_seed_excluded(&self, _event: &SeedExcludedEvent) {}
    fn on_iteration_skipped(&self, _event: &IterationSkippedEvent) {}
    fn on_tests_kept(&self, _event: &TestsKeptEvent) {}
    fn on_suite_complete(&self, _event: &SuiteCompleteEvent) {}
}
