use crate::errors::ToolingError;
use crate::types::{TestCase, TestExecutionResult, TestSuite};

/// Runs compiled tests in isolation and reports which ran and which failed.
pub trait TestHarness: Send + Sync {
    /// Run `tests` from the compiled `suite`.
    ///
    /// Red tests are reported in `TestExecutionResult::failures`; an `Err`
    /// means the harness itself malfunctioned.
    fn run(
        &self,
        suite: &TestSuite,
        tests: &[TestCase],
        classpath: &str,
    ) -> Result<TestExecutionResult, ToolingError>;
}
