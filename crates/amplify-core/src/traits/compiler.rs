use crate::errors::ToolingError;
use crate::types::{OutputPaths, TestSuite};

/// Builds a test suite against the program under test.
pub trait TestCompiler: Send + Sync {
    /// Compile `suite`, writing artifacts under `output`.
    ///
    /// All-or-nothing: any error means no part of the suite is usable.
    fn compile(&self, suite: &TestSuite, output: &OutputPaths) -> Result<(), ToolingError>;
}
