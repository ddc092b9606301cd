//! Report artifacts written at the end of a suite's amplification.

pub mod mutants;

pub use mutants::{MutantKillReport, TestKills};

use std::path::Path;

use amplify_core::errors::ReportError;

/// Write `content` to `path`, creating parent directories as needed.
pub(crate) fn write_artifact(path: &Path, content: &str) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)
}
