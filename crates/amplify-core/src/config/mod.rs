//! Configuration system for Amplify.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod amplification_config;
pub mod amplify_config;
pub mod execution_config;
pub mod mutation_config;
pub mod output_config;

pub use amplification_config::AmplificationConfig;
pub use amplify_config::{AmplifyConfig, CliOverrides};
pub use execution_config::ExecutionConfig;
pub use mutation_config::MutationConfig;
pub use output_config::OutputConfig;
