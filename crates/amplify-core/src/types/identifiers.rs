//! Stable identities for tests and mutants.
//!
//! Both are compared by value, never by reference, so a test that is cloned,
//! regenerated, or parsed back out of a tool report keeps its identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a test: qualified suite name plus method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestId {
    pub suite: String,
    pub method: String,
}

impl TestId {
    pub fn new(suite: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            method: method.into(),
        }
    }

    /// Parse `suite#method`, or a bare `method` resolved against `default_suite`.
    ///
    /// Returns `None` for empty input or an empty method name.
    pub fn parse(raw: &str, default_suite: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (suite, method) = match raw.rsplit_once('#') {
            Some((suite, method)) => (suite, method),
            None => (default_suite, raw),
        };
        if method.is_empty() {
            return None;
        }
        Some(Self::new(suite, method))
    }

    /// Unqualified suite name (`com.acme.FooTest` -> `FooTest`).
    pub fn suite_simple_name(&self) -> &str {
        self.suite.rsplit('.').next().unwrap_or(&self.suite)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.suite, self.method)
    }
}

/// Identity of a mutant: operator plus source location.
///
/// Stable across analysis runs on the same baseline, so outcomes from
/// different runs can be compared set-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MutantId {
    /// Fully qualified mutation operator name.
    pub operator: String,
    /// Fully qualified name of the mutated class or module.
    pub class: String,
    /// Mutated method or function.
    pub location: String,
    pub line: u32,
}

impl MutantId {
    pub fn new(
        operator: impl Into<String>,
        class: impl Into<String>,
        location: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            operator: operator.into(),
            class: class.into(),
            location: location.into(),
            line,
        }
    }
}

impl fmt::Display for MutantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:{} [{}]",
            self.class, self.location, self.line, self.operator
        )
    }
}
