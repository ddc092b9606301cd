//! Tests and test suites as the amplification loop sees them.
//!
//! Bodies are opaque source text. The core compares them for equality and
//! emptiness and nothing more.

use serde::{Deserialize, Serialize};

use super::identifiers::TestId;
use crate::traits::TestPredicate;

/// A named, executable unit of a test suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: TestId,
    pub body: String,
    /// Lineage hint set by the collaborator that produced this test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<TestId>,
    /// Assertions added by the derivation that produced this test.
    #[serde(default)]
    pub assertions_added: u32,
    /// Inputs added or modified by the derivation that produced this test.
    #[serde(default)]
    pub inputs_added: u32,
}

impl TestCase {
    pub fn new(id: TestId, body: impl Into<String>) -> Self {
        Self {
            id,
            body: body.into(),
            derived_from: None,
            assertions_added: 0,
            inputs_added: 0,
        }
    }

    /// Record which test this one was derived from.
    pub fn derived_from(mut self, parent: &TestId) -> Self {
        self.derived_from = Some(parent.clone());
        self
    }

    /// Record how many assertions and inputs this derivation added.
    pub fn with_additions(mut self, assertions: u32, inputs: u32) -> Self {
        self.assertions_added = assertions;
        self.inputs_added = inputs;
        self
    }

    pub fn name(&self) -> &str {
        &self.id.method
    }

    pub fn has_empty_body(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Syntactic identity: same body text, ignoring surrounding whitespace.
    pub fn same_body(&self, other: &TestCase) -> bool {
        self.body.trim() == other.body.trim()
    }
}

/// An ordered, named collection of tests plus opaque fixture members.
///
/// Suites are values: every derivation returns a new suite and leaves the
/// receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestSuite {
    /// Qualified suite name.
    pub name: String,
    /// Non-method members (fields, imports, helper declarations).
    #[serde(default)]
    pub fixtures: Vec<String>,
    /// All methods, tests and helpers alike.
    #[serde(default)]
    pub methods: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixtures: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_fixture(mut self, fixture: impl Into<String>) -> Self {
        self.fixtures.push(fixture.into());
        self
    }

    pub fn with_method(mut self, method: TestCase) -> Self {
        self.methods.push(method);
        self
    }

    /// Identity for a method of this suite.
    pub fn test_id(&self, method: &str) -> TestId {
        TestId::new(self.name.clone(), method)
    }

    pub fn method(&self, id: &TestId) -> Option<&TestCase> {
        self.methods.iter().find(|m| &m.id == id)
    }

    pub fn contains(&self, id: &TestId) -> bool {
        self.method(id).is_some()
    }

    /// Methods recognized as tests by `predicate`, in declaration order.
    pub fn tests(&self, predicate: &dyn TestPredicate) -> Vec<TestCase> {
        self.methods
            .iter()
            .filter(|m| predicate.is_test(m))
            .cloned()
            .collect()
    }

    /// A copy of this suite with every test method removed.
    pub fn without_tests(&self, predicate: &dyn TestPredicate) -> TestSuite {
        TestSuite {
            name: self.name.clone(),
            fixtures: self.fixtures.clone(),
            methods: self
                .methods
                .iter()
                .filter(|m| !predicate.is_test(m))
                .cloned()
                .collect(),
        }
    }

    /// A copy of this suite with `extra` appended.
    ///
    /// Methods whose identity already exists in the suite are skipped; the
    /// existing bodies are never replaced.
    pub fn extended_with(&self, extra: &[TestCase]) -> TestSuite {
        let mut suite = self.clone();
        for method in extra {
            if !suite.contains(&method.id) {
                suite.methods.push(method.clone());
            }
        }
        suite
    }
}
