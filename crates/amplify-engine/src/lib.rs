//! # amplify-engine
//!
//! The amplification loop and everything it needs beyond the core types:
//! test genealogy, selection strategies (mutation score, take-all), report
//! artifacts, process-backed tooling, and a parallel multi-suite driver.

pub mod genealogy;
pub mod orchestrator;
pub mod parallel;
pub mod report;
pub mod selection;
pub mod tooling;

pub use genealogy::Genealogy;
pub use orchestrator::{
    AmplificationOrchestrator, Collaborators, OrchestratorSettings, RunStats, SuiteOutcome,
};
pub use parallel::{amplify_suites_parallel, SuiteRun};
pub use selection::{MutationScoreSelector, SelectionReport, TakeAllSelector, TestSelector};
