//! Mutation-kill report: a plain-text summary plus a JSON listing of which
//! amplified test killed which new mutants.
//!
//! The JSON key names (`#AssertionAdded`, `MutantsKilled`, `lineNumber`, ...)
//! are consumed by downstream dashboards and must not change.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use amplify_core::errors::ReportError;
use amplify_core::{MutantId, MutantOutcome, TestId};
use rustc_hash::FxHashSet;
use serde::Serialize;

use super::write_artifact;

/// New mutants credited to one amplified test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestKills {
    pub test: TestId,
    /// Assertions added since the seed test.
    pub assertions_added: u32,
    /// Inputs added since the seed test.
    pub inputs_added: u32,
    pub mutants: Vec<MutantOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutantKillReport {
    pub selector: String,
    pub suite: String,
    pub original_killed: usize,
    pub tests: Vec<TestKills>,
}

#[derive(Serialize)]
struct KilledMutantEntry<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "lineNumber")]
    line_number: String,
    location: &'a str,
}

#[derive(Serialize)]
struct AmplifiedTestEntry<'a> {
    #[serde(rename = "#AssertionAdded")]
    assertions_added: u32,
    #[serde(rename = "#InputAdded")]
    inputs_added: u32,
    #[serde(rename = "#MutantKilled")]
    mutant_killed: usize,
    #[serde(rename = "MutantsKilled")]
    mutants_killed: Vec<KilledMutantEntry<'a>>,
}

impl MutantKillReport {
    pub fn text_file_name(suite: &str) -> String {
        format!("{suite}_mutants_report.txt")
    }

    pub fn json_file_name(suite: &str) -> String {
        format!("{suite}_mutants_killed.json")
    }

    /// Distinct mutants killed by the amplified tests and not by the
    /// original suite.
    pub fn new_mutants_killed(&self) -> usize {
        self.tests
            .iter()
            .flat_map(|t| t.mutants.iter().map(|o| &o.mutant))
            .collect::<FxHashSet<&MutantId>>()
            .len()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "======= REPORT =======");
        let _ = writeln!(out, "{}:", self.selector);
        let _ = writeln!(
            out,
            "The original test suite kills {} mutants",
            self.original_killed
        );
        let _ = writeln!(
            out,
            "The amplification results with {} new tests",
            self.tests.len()
        );
        let _ = writeln!(out, "it kills {} more mutants", self.new_mutants_killed());
        out
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        let tests: BTreeMap<&str, AmplifiedTestEntry<'_>> = self
            .tests
            .iter()
            .map(|t| {
                let entry = AmplifiedTestEntry {
                    assertions_added: t.assertions_added,
                    inputs_added: t.inputs_added,
                    mutant_killed: t.mutants.len(),
                    mutants_killed: t
                        .mutants
                        .iter()
                        .map(|o| KilledMutantEntry {
                            id: &o.mutant.operator,
                            line_number: o.line().to_string(),
                            location: o.location(),
                        })
                        .collect(),
                };
                (t.test.method.as_str(), entry)
            })
            .collect();
        let mut doc = BTreeMap::new();
        doc.insert(self.suite.as_str(), tests);
        serde_json::to_string_pretty(&doc)
    }

    /// Write both artifacts under `dir`, returning their paths.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        let text_path = dir.join(Self::text_file_name(&self.suite));
        write_artifact(&text_path, &self.render_text())?;

        let json_path = dir.join(Self::json_file_name(&self.suite));
        write_artifact(&json_path, &self.render_json()?)?;

        Ok(vec![text_path, json_path])
    }
}
