//! Materializing suites on disk for external tools.

use std::path::{Path, PathBuf};

use amplify_core::errors::ToolingError;
use amplify_core::TestSuite;

/// Renders a suite into the source form an external tool consumes.
pub trait SuiteWriter: Send + Sync {
    /// File name (relative to the target directory) for `suite`.
    fn file_name(&self, suite: &TestSuite) -> String;

    fn render(&self, suite: &TestSuite) -> Result<String, ToolingError>;

    /// Render `suite` into `dir`, returning the written path.
    fn write(&self, suite: &TestSuite, dir: &Path) -> Result<PathBuf, ToolingError> {
        let path = dir.join(self.file_name(suite));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ToolingError::io(format!("creating {}", parent.display()), e))?;
        }
        std::fs::write(&path, self.render(suite)?)
            .map_err(|e| ToolingError::io(format!("writing {}", path.display()), e))?;
        Ok(path)
    }
}

/// Writes `<dir>/<suite>.json` holding the serialized suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSuiteWriter;

impl SuiteWriter for JsonSuiteWriter {
    fn file_name(&self, suite: &TestSuite) -> String {
        format!("{}.json", suite.name)
    }

    fn render(&self, suite: &TestSuite) -> Result<String, ToolingError> {
        serde_json::to_string_pretty(suite).map_err(|e| ToolingError::io(
            format!("serializing {}", suite.name),
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        ))
    }
}

/// A suite written over whatever file previously held it. The previous
/// contents come back on `restore` or drop.
pub struct MaterializedSuite {
    path: PathBuf,
    backup: Option<Vec<u8>>,
    restored: bool,
}

impl MaterializedSuite {
    pub fn materialize(
        writer: &dyn SuiteWriter,
        suite: &TestSuite,
        dir: &Path,
    ) -> Result<Self, ToolingError> {
        let path = dir.join(writer.file_name(suite));
        let backup = std::fs::read(&path).ok();
        writer.write(suite, dir)?;
        Ok(Self {
            path,
            backup,
            restored: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Put back the previous file, or remove ours if there was none.
    pub fn restore(mut self) -> Result<(), ToolingError> {
        self.restore_in_place()
    }

    fn restore_in_place(&mut self) -> Result<(), ToolingError> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        let result = match &self.backup {
            Some(bytes) => std::fs::write(&self.path, bytes),
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        result.map_err(|e| ToolingError::io(format!("restoring {}", self.path.display()), e))
    }
}

impl Drop for MaterializedSuite {
    fn drop(&mut self) {
        if let Err(e) = self.restore_in_place() {
            tracing::warn!(error = %e, "could not restore materialized suite");
        }
    }
}
