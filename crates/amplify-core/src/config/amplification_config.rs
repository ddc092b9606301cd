//! Amplification loop configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AmplificationConfig {
    /// Iteration budget per seed test. Default: 3.
    pub max_iterations: Option<u32>,
    /// Run one round of assertion injection on the seed tests before the
    /// main loop. Default: true.
    pub pre_amplification: Option<bool>,
    /// Methods whose name starts with this prefix are tests. Default: "test".
    pub test_prefix: Option<String>,
}

impl AmplificationConfig {
    pub fn effective_max_iterations(&self) -> u32 {
        self.max_iterations
            .unwrap_or(constants::DEFAULT_MAX_ITERATIONS)
    }

    pub fn effective_pre_amplification(&self) -> bool {
        self.pre_amplification.unwrap_or(true)
    }

    pub fn effective_test_prefix(&self) -> &str {
        self.test_prefix.as_deref().unwrap_or("test")
    }
}
