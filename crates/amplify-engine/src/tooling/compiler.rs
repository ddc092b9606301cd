//! Compiler backed by an external build command.

use std::path::PathBuf;
use std::time::Duration;

use amplify_core::errors::ToolingError;
use amplify_core::traits::TestCompiler;
use amplify_core::{OutputPaths, TestSuite};

use super::process::{run_with_timeout, CommandSpec};
use super::writer::{MaterializedSuite, SuiteWriter};

/// Writes the suite under `source_dir`, then runs the compile command.
///
/// Succeeds iff the command exits with status 0. The written file is
/// restored afterwards so the working tree is left as it was found.
pub struct CommandCompiler {
    command: CommandSpec,
    source_dir: PathBuf,
    classpath: String,
    timeout: Duration,
    writer: Box<dyn SuiteWriter>,
}

impl CommandCompiler {
    pub fn new(
        command: CommandSpec,
        source_dir: impl Into<PathBuf>,
        writer: Box<dyn SuiteWriter>,
    ) -> Self {
        Self {
            command,
            source_dir: source_dir.into(),
            classpath: String::new(),
            timeout: Duration::from_secs(amplify_core::constants::DEFAULT_EXECUTION_TIMEOUT_SECS),
            writer,
        }
    }

    pub fn with_classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = classpath.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl TestCompiler for CommandCompiler {
    fn compile(&self, suite: &TestSuite, output: &OutputPaths) -> Result<(), ToolingError> {
        let materialized =
            MaterializedSuite::materialize(self.writer.as_ref(), suite, &self.source_dir)?;
        let source = materialized.path().display().to_string();
        let classes_dir = output.classes_dir.display().to_string();
        let test_classes_dir = output.test_classes_dir.display().to_string();
        let command = self.command.expanded(&[
            ("suite", suite.name.as_str()),
            ("source", source.as_str()),
            ("classes_dir", classes_dir.as_str()),
            ("test_classes_dir", test_classes_dir.as_str()),
            ("classpath", self.classpath.as_str()),
        ]);

        let result = run_with_timeout(&command, self.timeout);
        materialized.restore()?;
        let output = result?;
        if !output.success {
            return Err(ToolingError::CompilationFailed {
                suite: suite.name.clone(),
                message: output.diagnostics(20),
            });
        }
        tracing::debug!(suite = %suite.name, "compiled");
        Ok(())
    }
}
