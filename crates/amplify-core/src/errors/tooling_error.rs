//! Failures of external collaborators (compiler, harness, mutation engine).
//!
//! A tooling failure is distinct from a legitimately empty or red result:
//! it means the collaborator produced nothing usable.

use std::time::Duration;

use super::error_code::{self, AmplifyErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ToolingError {
    #[error("compilation of {suite} failed: {message}")]
    CompilationFailed { suite: String, message: String },

    #[error("test execution of {suite} failed: {message}")]
    ExecutionFailed { suite: String, message: String },

    #[error("mutation analysis failed: {message}")]
    AnalysisFailed { message: String },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("failed to spawn `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolingError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl AmplifyErrorCode for ToolingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::TOOLING_TIMEOUT,
            _ => error_code::TOOLING_FAILURE,
        }
    }
}
