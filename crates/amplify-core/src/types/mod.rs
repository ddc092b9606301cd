//! Value types shared between the amplification loop and its collaborators.

pub mod execution;
pub mod identifiers;
pub mod mutant;
pub mod suite;

pub use execution::{OutputPaths, TestExecutionResult};
pub use identifiers::{MutantId, TestId};
pub use mutant::{MutantOutcome, MutantState};
pub use suite::{TestCase, TestSuite};
