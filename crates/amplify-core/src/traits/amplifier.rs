use crate::types::{TestCase, TestSuite};

/// A syntactic transformation producing candidate variants of a test.
pub trait Amplifier: Send + Sync {
    /// Human-readable amplifier name, used in logs.
    fn name(&self) -> &str;

    /// Produce zero or more candidate variants of `test`.
    ///
    /// Returned candidates need fresh identities. A candidate without a
    /// `derived_from` hint is recorded as a child of `test`.
    fn apply(&self, test: &TestCase) -> Vec<TestCase>;

    /// Re-target the amplifier at a new suite before amplification starts.
    fn reset(&mut self, suite: &TestSuite);
}
