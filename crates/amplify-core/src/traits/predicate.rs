use crate::types::TestCase;

/// Decides which suite methods are genuine test cases.
pub trait TestPredicate: Send + Sync {
    fn is_test(&self, candidate: &TestCase) -> bool;
}

impl<F> TestPredicate for F
where
    F: Fn(&TestCase) -> bool + Send + Sync,
{
    fn is_test(&self, candidate: &TestCase) -> bool {
        self(candidate)
    }
}

/// Treats methods whose name starts with a fixed prefix as tests.
#[derive(Debug, Clone)]
pub struct NamePrefix(pub String);

impl Default for NamePrefix {
    fn default() -> Self {
        Self("test".to_string())
    }
}

impl TestPredicate for NamePrefix {
    fn is_test(&self, candidate: &TestCase) -> bool {
        candidate.name().starts_with(self.0.as_str())
    }
}
