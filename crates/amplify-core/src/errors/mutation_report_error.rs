//! Errors reading mutation-engine reports.

use super::error_code::{self, AmplifyErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum MutationReportError {
    #[error("malformed mutation record at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("no mutation report found under {path}")]
    Missing { path: String },

    #[error("failed to read mutation report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AmplifyErrorCode for MutationReportError {
    fn error_code(&self) -> &'static str {
        error_code::MUTATION_REPORT_ERROR
    }
}
