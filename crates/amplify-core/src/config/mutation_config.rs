//! Mutation engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MutationConfig {
    /// Command running the mutation engine (e.g. `mvn`). Arguments may use
    /// `{target_classes}`, `{suite}` and `{report_dir}`; the engine must write
    /// its report to `{report_dir}`.
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Argument prefix restricting a run to one suite, e.g. `-DtargetTests=`.
    /// The suite name is appended. Omitted from baseline runs.
    pub target_tests_prefix: Option<String>,
    /// Filter naming the classes to mutate, substituted for `{target_classes}`.
    pub target_classes: Option<String>,
    /// Root of the report directories. Each run gets `<root>/<suite>`, or
    /// `<root>/_baseline` for the baseline run.
    pub report_dir: Option<PathBuf>,
    /// Pre-computed baseline report; skips the baseline run when set.
    pub baseline_path: Option<PathBuf>,
    /// Per-run wall-clock limit. Default: 1800 seconds.
    pub timeout_secs: Option<u64>,
}

impl MutationConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .unwrap_or(constants::DEFAULT_MUTATION_TIMEOUT_SECS),
        )
    }

    pub fn effective_report_dir(&self) -> PathBuf {
        self.report_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_MUTATION_REPORT_DIR))
    }

    pub fn effective_target_tests_prefix(&self) -> &str {
        self.target_tests_prefix
            .as_deref()
            .unwrap_or("-DtargetTests=")
    }
}
