//! Capabilities of the external collaborators the amplification loop drives.
//!
//! Every fallible collaborator call returns `Result<_, ToolingError>`, so a
//! tooling failure is never confused with a legitimately empty result.

pub mod amplifier;
pub mod assertion;
pub mod compiler;
pub mod harness;
pub mod mutation;
pub mod predicate;

pub use amplifier::Amplifier;
pub use assertion::AssertionGenerator;
pub use compiler::TestCompiler;
pub use harness::TestHarness;
pub use mutation::MutationEngine;
pub use predicate::{NamePrefix, TestPredicate};
