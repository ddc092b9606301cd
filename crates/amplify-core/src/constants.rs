/// Amplify version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default iteration budget per seed test.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Default wall-clock limit for compile and test-run child processes.
pub const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 120;

/// Default wall-clock limit for a mutation-analysis child process.
pub const DEFAULT_MUTATION_TIMEOUT_SECS: u64 = 1_800;

/// Default directory for selection reports.
pub const DEFAULT_OUTPUT_DIR: &str = "amplify-out";

/// Default directory the mutation engine writes its reports to.
pub const DEFAULT_MUTATION_REPORT_DIR: &str = "target/pit-reports";

/// File name of the per-run mutation report.
pub const MUTATIONS_CSV: &str = "mutations.csv";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "amplify.toml";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "AMPLIFY_LOG";
