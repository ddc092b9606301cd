//! Errors persisting selection reports. Always fatal to the caller.

use super::error_code::{self, AmplifyErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no suite is being amplified, nothing to report")]
    NoActiveSuite,

    #[error("failed to write report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AmplifyErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
