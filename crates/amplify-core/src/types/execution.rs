//! Execution-harness results and compiler output locations.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::identifiers::TestId;

/// Which tests ran and which of them failed, for one harness invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestExecutionResult {
    pub tests_run: BTreeSet<TestId>,
    pub failures: BTreeSet<TestId>,
}

impl TestExecutionResult {
    pub fn new(
        tests_run: impl IntoIterator<Item = TestId>,
        failures: impl IntoIterator<Item = TestId>,
    ) -> Self {
        Self {
            tests_run: tests_run.into_iter().collect(),
            failures: failures.into_iter().collect(),
        }
    }

    /// Every listed test ran and passed.
    pub fn all_passed(tests: &[TestId]) -> Self {
        Self::new(tests.iter().cloned(), std::iter::empty())
    }

    pub fn is_green(&self) -> bool {
        self.failures.is_empty() && !self.tests_run.is_empty()
    }

    pub fn has_failed(&self, id: &TestId) -> bool {
        self.failures.contains(id)
    }

    pub fn ran(&self, id: &TestId) -> bool {
        self.tests_run.contains(id)
    }

    /// Ran and did not fail.
    pub fn passed(&self, id: &TestId) -> bool {
        self.ran(id) && !self.has_failed(id)
    }
}

/// Where the compiler writes program and test artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputPaths {
    pub classes_dir: PathBuf,
    pub test_classes_dir: PathBuf,
}

impl OutputPaths {
    pub fn new(classes_dir: impl Into<PathBuf>, test_classes_dir: impl Into<PathBuf>) -> Self {
        Self {
            classes_dir: classes_dir.into(),
            test_classes_dir: test_classes_dir.into(),
        }
    }
}
