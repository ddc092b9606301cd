use crate::types::{TestCase, TestSuite};

/// Observes runtime state and injects oracle assertions into tests.
pub trait AssertionGenerator: Send + Sync {
    /// Return assertion-augmented versions of `tests`.
    ///
    /// May return fewer tests than given when no meaningful assertion could
    /// be derived. An output with a new identity should set `derived_from`
    /// to the input it was built from.
    fn generate_assertions(&self, suite: &TestSuite, tests: &[TestCase]) -> Vec<TestCase>;
}
