//! Stable error codes for callers that dispatch on error kind.

/// Every error enum maps its variants to a stable code string.
pub trait AmplifyErrorCode {
    /// Returns the error code string (e.g., "TOOLING_FAILURE").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const TOOLING_FAILURE: &str = "TOOLING_FAILURE";
pub const TOOLING_TIMEOUT: &str = "TOOLING_TIMEOUT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const GENEALOGY_ERROR: &str = "GENEALOGY_ERROR";
pub const MUTATION_REPORT_ERROR: &str = "MUTATION_REPORT_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
