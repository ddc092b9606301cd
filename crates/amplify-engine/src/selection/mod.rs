//! Selection strategies: which tests to amplify next and which candidates
//! are worth keeping.
//!
//! A selector is a session-scoped state machine driven by the orchestrator:
//! `init` once, then per suite `select_to_amplify`/`select_to_keep` any number
//! of times, then `report`.

pub mod mutation_score;
pub mod take_all;

pub use mutation_score::{Baseline, MutationScoreSelector, SessionPhase};
pub use take_all::TakeAllSelector;

use std::path::PathBuf;

use amplify_core::errors::{ReportError, ToolingError};
use amplify_core::{TestCase, TestSuite};

use crate::genealogy::Genealogy;

/// Pluggable fitness strategy for the amplification loop.
pub trait TestSelector: Send {
    /// Strategy name, used in logs and report headers.
    fn name(&self) -> &'static str;

    /// Prepare the session, e.g. compute a baseline. Idempotent.
    fn init(&mut self) -> Result<(), ToolingError>;

    /// Start of a new seed test.
    fn reset(&mut self);

    /// Nominate which of `tests` should be expanded in this iteration.
    fn select_to_amplify(&mut self, suite: &TestSuite, tests: Vec<TestCase>) -> Vec<TestCase>;

    /// Decide which passing `candidates` are kept. `genealogy` resolves
    /// each candidate's ancestors.
    fn select_to_keep(&mut self, candidates: Vec<TestCase>, genealogy: &Genealogy)
        -> Vec<TestCase>;

    /// Notification that the program under test may have changed.
    fn update(&mut self);

    /// Summarize the session for the current suite and close it.
    fn report(&mut self, genealogy: &Genealogy) -> Result<SelectionReport, ReportError>;

    /// The suite to compile and run for a batch of candidates.
    fn build_suite_for_selection(&self, original: &TestSuite, tests: &[TestCase]) -> TestSuite {
        original.extended_with(tests)
    }

    /// Number of tests kept so far.
    fn amplified_test_count(&self) -> usize;
}

/// What a selector produced for one suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    pub selector: &'static str,
    pub suite: String,
    pub amplified_tests: usize,
    /// Mutants the original suite already killed; zero for selectors that
    /// do not measure mutation score.
    pub original_killed: usize,
    pub newly_killed: usize,
    /// Human-readable summary, also logged.
    pub summary: String,
    /// Files written by the report.
    pub artifacts: Vec<PathBuf>,
}
