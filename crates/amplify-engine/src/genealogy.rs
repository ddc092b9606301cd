//! Lineage of derived tests: a suite-scoped `child -> parent` table.
//!
//! Every derived test has exactly one parent, looked up by identity. Chains
//! end at an original seed test, which has no entry. The table stays
//! acyclic: `record` refuses any edge that would close a loop.

use amplify_core::errors::GenealogyError;
use amplify_core::{TestCase, TestId};
use rustc_hash::FxHashMap;

/// One derivation step.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lineage {
    parent: TestId,
    assertions_added: u32,
    inputs_added: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Genealogy {
    edges: FxHashMap<TestId, Lineage>,
}

impl Genealogy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` was derived from `parent`.
    ///
    /// Re-recording the same edge refreshes the child's addition counts.
    pub fn record(&mut self, child: &TestCase, parent: &TestId) -> Result<(), GenealogyError> {
        if &child.id == parent || self.ancestors(parent).any(|a| a == &child.id) {
            return Err(GenealogyError::Cycle {
                child: child.id.to_string(),
                parent: parent.to_string(),
            });
        }
        if let Some(existing) = self.edges.get(&child.id) {
            if &existing.parent != parent {
                return Err(GenealogyError::AlreadyParented {
                    child: child.id.to_string(),
                    existing: existing.parent.to_string(),
                    requested: parent.to_string(),
                });
            }
        }
        self.edges.insert(
            child.id.clone(),
            Lineage {
                parent: parent.clone(),
                assertions_added: child.assertions_added,
                inputs_added: child.inputs_added,
            },
        );
        Ok(())
    }

    pub fn parent_of(&self, id: &TestId) -> Option<&TestId> {
        self.edges.get(id).map(|l| &l.parent)
    }

    /// Ancestors of `id`, nearest first. Does not include `id` itself.
    pub fn ancestors<'a>(&'a self, id: &TestId) -> Ancestors<'a> {
        Ancestors {
            genealogy: self,
            next: self.parent_of(id),
        }
    }

    /// The original seed test `id` descends from (`id` itself for a seed).
    pub fn root_of(&self, id: &TestId) -> TestId {
        self.ancestors(id).last().unwrap_or(id).clone()
    }

    /// Number of derivation steps between `id` and its seed.
    pub fn depth(&self, id: &TestId) -> usize {
        self.ancestors(id).count()
    }

    pub fn is_derived(&self, id: &TestId) -> bool {
        self.edges.contains_key(id)
    }

    /// Assertions added along the whole chain from the seed to `id`.
    pub fn assertions_since_origin(&self, id: &TestId) -> u32 {
        self.chain(id).map(|l| l.assertions_added).sum()
    }

    /// Inputs added along the whole chain from the seed to `id`.
    pub fn inputs_since_origin(&self, id: &TestId) -> u32 {
        self.chain(id).map(|l| l.inputs_added).sum()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Drop all lineage, e.g. when moving to a new seed suite.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Lineage entries of `id` and each of its derived ancestors.
    fn chain<'a>(&'a self, id: &TestId) -> impl Iterator<Item = &'a Lineage> + 'a {
        let mut next = self.edges.get(id);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.edges.get(&current.parent);
            Some(current)
        })
    }
}

/// Iterator over a test's ancestors, nearest first.
pub struct Ancestors<'a> {
    genealogy: &'a Genealogy,
    next: Option<&'a TestId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TestId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.genealogy.parent_of(current);
        Some(current)
    }
}
