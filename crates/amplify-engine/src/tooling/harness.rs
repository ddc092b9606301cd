//! Test harness backed by an external runner command.
//!
//! The runner prints one JSON document on stdout:
//!
//! ```json
//! {"tests_run": ["com.acme.CalcTest#testAdd", "testSub"], "failures": ["testSub"]}
//! ```
//!
//! Bare method names are resolved against the suite being run. The exit
//! status is ignored: red tests usually make runners exit non-zero.

use std::time::Duration;

use amplify_core::errors::ToolingError;
use amplify_core::traits::TestHarness;
use amplify_core::{TestCase, TestExecutionResult, TestId, TestSuite};
use serde::Deserialize;

use super::process::{run_with_timeout, CommandSpec};

#[derive(Debug, Deserialize)]
struct RunnerReport {
    #[serde(default)]
    tests_run: Vec<String>,
    #[serde(default)]
    failures: Vec<String>,
}

/// Placeholders: `{suite}`, `{tests}` (comma-separated method names),
/// `{classpath}`.
pub struct CommandHarness {
    command: CommandSpec,
    timeout: Duration,
}

impl CommandHarness {
    pub fn new(command: CommandSpec) -> Self {
        Self {
            command,
            timeout: Duration::from_secs(amplify_core::constants::DEFAULT_EXECUTION_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl TestHarness for CommandHarness {
    fn run(
        &self,
        suite: &TestSuite,
        tests: &[TestCase],
        classpath: &str,
    ) -> Result<TestExecutionResult, ToolingError> {
        let names = tests.iter().map(|t| t.name()).collect::<Vec<_>>().join(",");
        let command = self.command.expanded(&[
            ("suite", suite.name.as_str()),
            ("tests", names.as_str()),
            ("classpath", classpath),
        ]);
        let output = run_with_timeout(&command, self.timeout)?;
        parse_runner_output(&output.stdout, &suite.name).map_err(|message| {
            ToolingError::ExecutionFailed {
                suite: suite.name.clone(),
                message: format!("{message}; runner said: {}", output.diagnostics(5)),
            }
        })
    }
}

/// Parse the runner's JSON report, resolving bare names against `suite`.
pub fn parse_runner_output(stdout: &str, suite: &str) -> Result<TestExecutionResult, String> {
    // Runners may log before the report; the report is the last JSON line.
    let json = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .ok_or_else(|| "no JSON report on stdout".to_string())?;
    let report: RunnerReport =
        serde_json::from_str(json).map_err(|e| format!("invalid runner report: {e}"))?;
    let resolve = |names: Vec<String>| -> Vec<TestId> {
        names
            .iter()
            .filter_map(|n| TestId::parse(n, suite))
            .collect()
    };
    Ok(TestExecutionResult::new(
        resolve(report.tests_run),
        resolve(report.failures),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_after_log_lines() {
        let stdout = "starting runner\n{\"tests_run\": [\"testAdd\", \"other.Suite#testX\"], \"failures\": [\"testAdd\"]}\n";
        let result = parse_runner_output(stdout, "com.acme.CalcTest").unwrap();
        assert!(result.ran(&TestId::new("other.Suite", "testX")));
        assert!(result.has_failed(&TestId::new("com.acme.CalcTest", "testAdd")));
        assert_eq!(result.tests_run.len(), 2);
    }

    #[test]
    fn missing_report_is_an_error() {
        assert!(parse_runner_output("Exception in thread main", "S").is_err());
        assert!(parse_runner_output("{not json", "S").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn runs_command_and_reads_stdout() {
        let harness = CommandHarness::new(CommandSpec::new("sh").args([
            "-c",
            "echo '{\"tests_run\": [\"{tests}\"], \"failures\": []}'",
        ]))
        .with_timeout(Duration::from_secs(10));
        let suite = TestSuite::new("com.acme.CalcTest");
        let test = TestCase::new(suite.test_id("testAdd"), "calc.add(1, 1);");
        let result = harness.run(&suite, &[test.clone()], "").unwrap();
        assert!(result.passed(&test.id));
    }
}
