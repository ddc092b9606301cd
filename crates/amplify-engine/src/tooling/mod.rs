//! Process-backed collaborators: compiler, harness, and mutation engine
//! that each run a configured command under a hard timeout.

pub mod compiler;
pub mod harness;
pub mod pit;
pub mod pit_csv;
pub mod process;
pub mod writer;

pub use compiler::CommandCompiler;
pub use harness::CommandHarness;
pub use pit::PitMutationEngine;
pub use pit_csv::{find_mutations_csv, load_mutations_csv, parse_killing_test, parse_mutations_csv};
pub use process::{run_with_timeout, CommandSpec, ProcessOutput};
pub use writer::{JsonSuiteWriter, MaterializedSuite, SuiteWriter};

use std::path::Path;

use amplify_core::errors::ConfigError;
use amplify_core::AmplifyConfig;

/// The three process-backed collaborators built from one configuration.
pub struct ProcessToolchain {
    pub compiler: CommandCompiler,
    pub harness: CommandHarness,
    pub engine: PitMutationEngine,
}

impl ProcessToolchain {
    /// Build the toolchain for the project at `root`. Each command is run
    /// from `root`; suites are materialized with [`JsonSuiteWriter`].
    pub fn from_config(config: &AmplifyConfig, root: &Path) -> Result<Self, ConfigError> {
        let execution = &config.execution;
        let mutation = &config.mutation;

        let command = |field: &str, program: &Option<String>, args: &[String]| {
            program
                .as_deref()
                .map(|p| CommandSpec::new(p).args(args.iter().cloned()).current_dir(root))
                .ok_or_else(|| ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "a command is required for process-backed tooling".to_string(),
                })
        };

        let source_dir = root.join(execution.effective_test_source_dir());
        let compiler = CommandCompiler::new(
            command(
                "execution.compile_command",
                &execution.compile_command,
                &execution.compile_args,
            )?,
            &source_dir,
            Box::new(JsonSuiteWriter),
        )
        .with_classpath(execution.effective_classpath())
        .with_timeout(execution.effective_timeout());

        let harness = CommandHarness::new(command(
            "execution.test_command",
            &execution.test_command,
            &execution.test_args,
        )?)
        .with_timeout(execution.effective_timeout());

        let mut engine = PitMutationEngine::new(
            command("mutation.command", &mutation.command, &mutation.args)?,
            mutation.effective_report_dir(),
            execution.effective_test_source_dir(),
            Box::new(JsonSuiteWriter),
        )
        .with_target_tests_prefix(mutation.effective_target_tests_prefix())
        .with_timeout(mutation.effective_timeout());
        if let Some(filter) = &mutation.target_classes {
            engine = engine.with_target_classes(filter.clone());
        }

        Ok(Self {
            compiler,
            harness,
            engine,
        })
    }
}
