//! Mutation engine that shells out to PIT (or anything writing the same
//! `mutations.csv` report).
//!
//! Every run gets its own report directory under the configured root:
//! `<report_dir>/<suite>` for per-suite runs and `<report_dir>/_baseline`
//! for the baseline. The command learns it through `{report_dir}`, so
//! engines for different suites can share a root and run concurrently.

use std::path::{Path, PathBuf};
use std::time::Duration;

use amplify_core::errors::ToolingError;
use amplify_core::traits::MutationEngine;
use amplify_core::{MutantOutcome, TestSuite};
use tracing::{debug, info, warn};

use super::pit_csv::{find_mutations_csv, load_mutations_csv};
use super::process::{run_with_timeout, CommandSpec};
use super::writer::{MaterializedSuite, SuiteWriter};

/// Report sub-directory of runs not restricted to one suite.
const BASELINE_SCOPE: &str = "_baseline";

pub struct PitMutationEngine {
    command: CommandSpec,
    /// Prefix of the argument restricting a run to one suite.
    target_tests_prefix: String,
    target_classes: String,
    report_dir: PathBuf,
    test_source_dir: PathBuf,
    timeout: Duration,
    writer: Box<dyn SuiteWriter>,
}

impl PitMutationEngine {
    /// `report_dir` and `test_source_dir` are resolved against the
    /// command's working directory when relative. `report_dir` is a root;
    /// each run writes below it, see [`Self::report_dir_for`].
    pub fn new(
        command: CommandSpec,
        report_dir: impl Into<PathBuf>,
        test_source_dir: impl Into<PathBuf>,
        writer: Box<dyn SuiteWriter>,
    ) -> Self {
        Self {
            command,
            target_tests_prefix: "-DtargetTests=".to_string(),
            target_classes: String::new(),
            report_dir: report_dir.into(),
            test_source_dir: test_source_dir.into(),
            timeout: Duration::from_secs(amplify_core::constants::DEFAULT_MUTATION_TIMEOUT_SECS),
            writer,
        }
    }

    pub fn with_target_tests_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_tests_prefix = prefix.into();
        self
    }

    pub fn with_target_classes(mut self, filter: impl Into<String>) -> Self {
        self.target_classes = filter.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.command.working_dir {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Directory a run restricted to `target_suite` (or the baseline run,
    /// for `None`) reads its report from.
    pub fn report_dir_for(&self, target_suite: Option<&str>) -> PathBuf {
        self.resolve(&self.report_dir)
            .join(target_suite.unwrap_or(BASELINE_SCOPE))
    }

    /// Run the engine, optionally restricted to `target_suite`, and parse
    /// the report it leaves behind.
    fn run(&self, target_suite: Option<&str>) -> Result<Vec<MutantOutcome>, ToolingError> {
        let report_dir = self.report_dir_for(target_suite);
        match std::fs::remove_dir_all(&report_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ToolingError::io(
                    format!("clearing {}", report_dir.display()),
                    e,
                ))
            }
        }

        let report_dir_arg = report_dir.display().to_string();
        let mut command = self.command.expanded(&[
            ("target_classes", self.target_classes.as_str()),
            ("suite", target_suite.unwrap_or_default()),
            ("report_dir", report_dir_arg.as_str()),
        ]);
        if let Some(suite) = target_suite {
            command.args.push(format!("{}{suite}", self.target_tests_prefix));
        }

        let output = run_with_timeout(&command, self.timeout)?;
        if !output.success {
            return Err(ToolingError::AnalysisFailed {
                message: format!(
                    "`{command}` exited with {:?}: {}",
                    output.status_code,
                    output.diagnostics(20)
                ),
            });
        }

        let csv = find_mutations_csv(&report_dir).map_err(|e| ToolingError::AnalysisFailed {
            message: e.to_string(),
        })?;
        let outcomes = load_mutations_csv(&csv).map_err(|e| ToolingError::AnalysisFailed {
            message: e.to_string(),
        })?;
        debug!(report = %csv.display(), mutants = outcomes.len(), "mutation report parsed");
        Ok(outcomes)
    }
}

impl MutationEngine for PitMutationEngine {
    fn analyze_baseline(&self) -> Result<Vec<MutantOutcome>, ToolingError> {
        info!("running baseline mutation analysis");
        self.run(None)
    }

    fn analyze(&self, suite: &TestSuite) -> Result<Vec<MutantOutcome>, ToolingError> {
        let source_dir = self.resolve(&self.test_source_dir);
        let materialized =
            MaterializedSuite::materialize(self.writer.as_ref(), suite, &source_dir)?;
        let outcomes = self.run(Some(&suite.name));
        if let Err(e) = materialized.restore() {
            warn!(suite = %suite.name, error = %e, "could not restore test source");
        }
        outcomes
    }
}
