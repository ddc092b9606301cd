//! Top-level Amplify configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AmplificationConfig, ExecutionConfig, MutationConfig, OutputConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`AMPLIFY_*`)
/// 3. Project config (`amplify.toml` in project root)
/// 4. User config (`~/.amplify/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AmplifyConfig {
    pub amplification: AmplificationConfig,
    pub execution: ExecutionConfig,
    pub mutation: MutationConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_iterations: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub baseline_path: Option<PathBuf>,
    pub mutation_timeout_secs: Option<u64>,
}

impl AmplifyConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Project config
        let project_config_path = root.join(constants::PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &AmplifyConfig) -> Result<(), ConfigError> {
        if config.amplification.max_iterations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "amplification.max_iterations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.execution.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "execution.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.mutation.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "mutation.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".amplify").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut AmplifyConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: AmplifyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut AmplifyConfig, other: &AmplifyConfig) {
        // Amplification
        if other.amplification.max_iterations.is_some() {
            base.amplification.max_iterations = other.amplification.max_iterations;
        }
        if other.amplification.pre_amplification.is_some() {
            base.amplification.pre_amplification = other.amplification.pre_amplification;
        }
        if other.amplification.test_prefix.is_some() {
            base.amplification.test_prefix = other.amplification.test_prefix.clone();
        }

        // Execution
        let (b, o) = (&mut base.execution, &other.execution);
        if o.compile_command.is_some() {
            b.compile_command = o.compile_command.clone();
        }
        if !o.compile_args.is_empty() {
            b.compile_args = o.compile_args.clone();
        }
        if o.test_command.is_some() {
            b.test_command = o.test_command.clone();
        }
        if !o.test_args.is_empty() {
            b.test_args = o.test_args.clone();
        }
        if o.test_source_dir.is_some() {
            b.test_source_dir = o.test_source_dir.clone();
        }
        if o.classes_dir.is_some() {
            b.classes_dir = o.classes_dir.clone();
        }
        if o.test_classes_dir.is_some() {
            b.test_classes_dir = o.test_classes_dir.clone();
        }
        if o.classpath.is_some() {
            b.classpath = o.classpath.clone();
        }
        if o.timeout_secs.is_some() {
            b.timeout_secs = o.timeout_secs;
        }

        // Mutation
        let (b, o) = (&mut base.mutation, &other.mutation);
        if o.command.is_some() {
            b.command = o.command.clone();
        }
        if !o.args.is_empty() {
            b.args = o.args.clone();
        }
        if o.target_tests_prefix.is_some() {
            b.target_tests_prefix = o.target_tests_prefix.clone();
        }
        if o.target_classes.is_some() {
            b.target_classes = o.target_classes.clone();
        }
        if o.report_dir.is_some() {
            b.report_dir = o.report_dir.clone();
        }
        if o.baseline_path.is_some() {
            b.baseline_path = o.baseline_path.clone();
        }
        if o.timeout_secs.is_some() {
            b.timeout_secs = o.timeout_secs;
        }

        // Output
        if other.output.directory.is_some() {
            base.output.directory = other.output.directory.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `AMPLIFY_MAX_ITERATIONS`, `AMPLIFY_OUTPUT_DIR`, etc.
    fn apply_env_overrides(config: &mut AmplifyConfig) {
        if let Ok(val) = std::env::var("AMPLIFY_MAX_ITERATIONS") {
            if let Ok(v) = val.parse::<u32>() {
                config.amplification.max_iterations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AMPLIFY_OUTPUT_DIR") {
            config.output.directory = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("AMPLIFY_CLASSPATH") {
            config.execution.classpath = Some(val);
        }
        if let Ok(val) = std::env::var("AMPLIFY_EXECUTION_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.execution.timeout_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AMPLIFY_MUTATION_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.mutation.timeout_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AMPLIFY_MUTATION_BASELINE") {
            config.mutation.baseline_path = Some(PathBuf::from(val));
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut AmplifyConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_iterations {
            config.amplification.max_iterations = Some(v);
        }
        if let Some(ref v) = cli.output_dir {
            config.output.directory = Some(v.clone());
        }
        if let Some(ref v) = cli.baseline_path {
            config.mutation.baseline_path = Some(v.clone());
        }
        if let Some(v) = cli.mutation_timeout_secs {
            config.mutation.timeout_secs = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
