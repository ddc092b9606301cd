//! Compiler and test-harness configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::OutputPaths;

/// Commands backing the compile and run steps.
///
/// Arguments may contain the placeholders `{suite}`, `{classes_dir}`,
/// `{test_classes_dir}`, and `{classpath}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExecutionConfig {
    pub compile_command: Option<String>,
    #[serde(default)]
    pub compile_args: Vec<String>,
    pub test_command: Option<String>,
    #[serde(default)]
    pub test_args: Vec<String>,
    /// Where materialized suites are written before compilation.
    pub test_source_dir: Option<PathBuf>,
    pub classes_dir: Option<PathBuf>,
    pub test_classes_dir: Option<PathBuf>,
    pub classpath: Option<String>,
    /// Per-process wall-clock limit. Default: 120 seconds.
    pub timeout_secs: Option<u64>,
}

impl ExecutionConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .unwrap_or(constants::DEFAULT_EXECUTION_TIMEOUT_SECS),
        )
    }

    pub fn effective_test_source_dir(&self) -> PathBuf {
        self.test_source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("src/test/amplify"))
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(
            self.classes_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("target/classes")),
            self.test_classes_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("target/test-classes")),
        )
    }

    pub fn effective_classpath(&self) -> String {
        self.classpath.clone().unwrap_or_default()
    }
}
