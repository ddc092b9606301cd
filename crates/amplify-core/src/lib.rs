//! # amplify-core
//!
//! Foundation crate for the Amplify test amplifier.
//! Defines the value types exchanged with external collaborators, the
//! collaborator traits themselves, errors, config, events, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::AmplifyConfig;
pub use errors::{AmplifyError, AmplifyResult};
pub use types::{
    MutantId, MutantOutcome, MutantState, OutputPaths, TestCase, TestExecutionResult, TestId,
    TestSuite,
};
