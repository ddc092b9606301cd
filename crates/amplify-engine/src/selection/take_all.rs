//! Keeps every candidate that compiles and passes.

use amplify_core::errors::{ReportError, ToolingError};
use amplify_core::{TestCase, TestId, TestSuite};
use tracing::info;

use super::{SelectionReport, TestSelector};
use crate::genealogy::Genealogy;

#[derive(Debug, Default)]
pub struct TakeAllSelector {
    kept: Vec<TestId>,
    current_suite: Option<String>,
}

impl TakeAllSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kept(&self) -> &[TestId] {
        &self.kept
    }
}

impl TestSelector for TakeAllSelector {
    fn name(&self) -> &'static str {
        "TakeAllSelector"
    }

    fn init(&mut self) -> Result<(), ToolingError> {
        Ok(())
    }

    fn reset(&mut self) {}

    fn select_to_amplify(&mut self, suite: &TestSuite, tests: Vec<TestCase>) -> Vec<TestCase> {
        if self.current_suite.is_none() {
            self.current_suite = Some(suite.name.clone());
        }
        tests
    }

    fn select_to_keep(
        &mut self,
        candidates: Vec<TestCase>,
        _genealogy: &Genealogy,
    ) -> Vec<TestCase> {
        self.kept.extend(candidates.iter().map(|c| c.id.clone()));
        candidates
    }

    fn update(&mut self) {}

    fn report(&mut self, _genealogy: &Genealogy) -> Result<SelectionReport, ReportError> {
        let suite = self.current_suite.take().ok_or(ReportError::NoActiveSuite)?;
        let amplified_tests = self.kept.iter().filter(|t| t.suite == suite).count();
        let summary = format!("{}: kept {amplified_tests} new tests for {suite}", self.name());
        info!("{summary}");
        Ok(SelectionReport {
            selector: self.name(),
            suite,
            amplified_tests,
            original_killed: 0,
            newly_killed: 0,
            summary,
            artifacts: Vec::new(),
        })
    }

    fn amplified_test_count(&self) -> usize {
        self.kept.len()
    }
}
