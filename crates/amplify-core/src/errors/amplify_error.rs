//! Aggregate error for callers driving whole suites.

use super::error_code::AmplifyErrorCode;
use super::{ConfigError, GenealogyError, MutationReportError, ReportError, ToolingError};

/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AmplifyError {
    #[error("Tooling error: {0}")]
    Tooling(#[from] ToolingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Genealogy error: {0}")]
    Genealogy(#[from] GenealogyError),

    #[error("Mutation report error: {0}")]
    MutationReport(#[from] MutationReportError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl AmplifyErrorCode for AmplifyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Tooling(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Genealogy(e) => e.error_code(),
            Self::MutationReport(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
        }
    }
}

pub type AmplifyResult<T> = Result<T, AmplifyError>;
