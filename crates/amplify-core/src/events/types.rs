//! Event payload types.

use crate::types::TestId;

/// Payload for `on_suite_started`.
#[derive(Debug, Clone)]
pub struct SuiteStartedEvent {
    pub suite: String,
    pub seed_tests: usize,
    pub max_iterations: u32,
}

/// Payload for `on_seed_excluded`.
#[derive(Debug, Clone)]
pub struct SeedExcludedEvent {
    pub suite: String,
    pub test: TestId,
}

/// Why an iteration produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NothingNominated,
    NoCandidates,
    CompilationFailed,
    ExecutionFailed,
    IncompleteRun,
}

/// Payload for `on_iteration_skipped`.
#[derive(Debug, Clone)]
pub struct IterationSkippedEvent {
    pub seed_test: TestId,
    pub iteration: u32,
    pub reason: SkipReason,
}

/// Payload for `on_tests_kept`.
#[derive(Debug, Clone)]
pub struct TestsKeptEvent {
    pub seed_test: TestId,
    pub iteration: u32,
    pub candidates: usize,
    pub kept: Vec<TestId>,
}

/// Payload for `on_suite_complete`.
#[derive(Debug, Clone)]
pub struct SuiteCompleteEvent {
    pub suite: String,
    pub amplified_tests: usize,
    pub duration_ms: u64,
}
