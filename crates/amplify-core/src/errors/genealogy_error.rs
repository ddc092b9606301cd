//! Lineage table violations.

use super::error_code::{self, AmplifyErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum GenealogyError {
    #[error("{child} already derives from {existing}, cannot re-parent to {requested}")]
    AlreadyParented {
        child: String,
        existing: String,
        requested: String,
    },

    #[error("recording {child} -> {parent} would create a cycle")]
    Cycle { child: String, parent: String },
}

impl AmplifyErrorCode for GenealogyError {
    fn error_code(&self) -> &'static str {
        error_code::GENEALOGY_ERROR
    }
}
