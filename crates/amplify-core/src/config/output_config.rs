//! Report output configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for per-suite reports. Default: `amplify-out`.
    pub directory: Option<PathBuf>,
}

impl OutputConfig {
    pub fn effective_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_DIR))
    }
}
