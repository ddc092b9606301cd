use crate::errors::ToolingError;
use crate::types::{MutantOutcome, TestSuite};

/// Injects mutants into the program and reports each one's fate.
pub trait MutationEngine: Send + Sync {
    /// Analyze the program against the unmodified test suites.
    fn analyze_baseline(&self) -> Result<Vec<MutantOutcome>, ToolingError>;

    /// Analyze the program against `suite` only.
    fn analyze(&self, suite: &TestSuite) -> Result<Vec<MutantOutcome>, ToolingError>;
}
