//! Mutation-score-guided selection.
//!
//! A candidate is kept when the mutation engine credits it with killing a
//! mutant that
//! - the original suite did not kill,
//! - the original suite reached with a decisive outcome, and
//! - none of the candidate's ancestors has already been credited for.
//!
//! Credits accumulate for the whole session and are never withdrawn.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use amplify_core::config::AmplifyConfig;
use amplify_core::errors::{AmplifyResult, ReportError, ToolingError};
use amplify_core::traits::{MutationEngine, NamePrefix, TestPredicate};
use amplify_core::{MutantId, MutantOutcome, TestCase, TestId, TestSuite};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::{SelectionReport, TestSelector};
use crate::genealogy::Genealogy;
use crate::report::{MutantKillReport, TestKills};
use crate::tooling::load_mutations_csv;

/// Lifecycle of a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Baselined,
    Scoring,
    Reported,
}

/// What the original suite achieved, computed once per session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Baseline {
    total_mutants: usize,
    original_killed: FxHashSet<MutantId>,
    never_exercised: FxHashSet<MutantId>,
}

impl Baseline {
    pub fn from_outcomes(outcomes: &[MutantOutcome]) -> Self {
        let mut baseline = Self {
            total_mutants: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            if !outcome.state.is_reliable() {
                baseline.never_exercised.insert(outcome.mutant.clone());
            } else if outcome.is_killed() {
                baseline.original_killed.insert(outcome.mutant.clone());
            }
        }
        baseline
    }

    /// Mutants in the baseline run.
    pub fn total_mutants(&self) -> usize {
        self.total_mutants
    }

    /// Mutants the original suite already kills. Never credited again.
    pub fn original_killed(&self) -> &FxHashSet<MutantId> {
        &self.original_killed
    }

    /// Mutants whose baseline outcome was indecisive (timeout, error, ...).
    /// Excluded from scoring for the whole session.
    pub fn never_exercised(&self) -> &FxHashSet<MutantId> {
        &self.never_exercised
    }

    fn is_creditable(&self, mutant: &MutantId) -> bool {
        !self.original_killed.contains(mutant) && !self.never_exercised.contains(mutant)
    }
}

pub struct MutationScoreSelector {
    engine: Box<dyn MutationEngine>,
    predicate: Arc<dyn TestPredicate>,
    output_dir: PathBuf,
    baseline: Option<Baseline>,
    /// Kept test -> new mutants it is credited with. Insert-only.
    newly_killed: BTreeMap<TestId, BTreeMap<MutantId, MutantOutcome>>,
    current_suite: Option<TestSuite>,
    phase: SessionPhase,
}

impl MutationScoreSelector {
    pub fn new(
        engine: Box<dyn MutationEngine>,
        predicate: Arc<dyn TestPredicate>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            predicate,
            output_dir: output_dir.into(),
            baseline: None,
            newly_killed: BTreeMap::new(),
            current_suite: None,
            phase: SessionPhase::Uninitialized,
        }
    }

    /// Selector writing to `output.directory` and recognizing tests by
    /// `amplification.test_prefix`. When `mutation.baseline_path` is set the
    /// baseline is read from that PIT report and the engine never runs it.
    pub fn from_config(
        config: &AmplifyConfig,
        engine: Box<dyn MutationEngine>,
    ) -> AmplifyResult<Self> {
        let predicate = NamePrefix(config.amplification.effective_test_prefix().to_string());
        let selector = Self::new(
            engine,
            Arc::new(predicate),
            config.output.effective_directory(),
        );
        match &config.mutation.baseline_path {
            Some(path) => {
                info!(path = %path.display(), "reading mutation baseline");
                Ok(selector.with_baseline(&load_mutations_csv(path)?))
            }
            None => Ok(selector),
        }
    }

    /// Start from a pre-computed baseline instead of running the engine.
    pub fn with_baseline(mut self, outcomes: &[MutantOutcome]) -> Self {
        self.load_baseline(outcomes);
        self
    }

    /// Replace the baseline with the given analysis outcomes.
    pub fn load_baseline(&mut self, outcomes: &[MutantOutcome]) {
        let baseline = Baseline::from_outcomes(outcomes);
        info!(
            mutants = baseline.total_mutants,
            killed = baseline.original_killed.len(),
            excluded = baseline.never_exercised.len(),
            "mutation baseline loaded"
        );
        self.baseline = Some(baseline);
        self.phase = SessionPhase::Baselined;
    }

    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// All credits granted so far, per kept test.
    pub fn newly_killed(&self) -> &BTreeMap<TestId, BTreeMap<MutantId, MutantOutcome>> {
        &self.newly_killed
    }

    /// Mutants credited to `test`, in identity order.
    pub fn credited_mutants(&self, test: &TestId) -> Vec<MutantId> {
        self.newly_killed
            .get(test)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// True when no ancestor of `test` already holds a credit for `mutant`.
    fn kills_more_than_ancestors(
        &self,
        test: &TestId,
        mutant: &MutantId,
        genealogy: &Genealogy,
    ) -> bool {
        genealogy.ancestors(test).all(|ancestor| {
            self.newly_killed
                .get(ancestor)
                .map_or(true, |credits| !credits.contains_key(mutant))
        })
    }

    fn kill_report(&self, suite: &str, genealogy: &Genealogy) -> MutantKillReport {
        let tests = self
            .newly_killed
            .iter()
            .filter(|(test, _)| test.suite == suite)
            .map(|(test, credits)| TestKills {
                test: test.clone(),
                assertions_added: genealogy.assertions_since_origin(test),
                inputs_added: genealogy.inputs_since_origin(test),
                mutants: credits.values().cloned().collect(),
            })
            .collect();
        MutantKillReport {
            selector: self.name().to_string(),
            suite: suite.to_string(),
            original_killed: self
                .baseline
                .as_ref()
                .map_or(0, |b| b.original_killed.len()),
            tests,
        }
    }
}

impl TestSelector for MutationScoreSelector {
    fn name(&self) -> &'static str {
        "MutationScoreSelector"
    }

    fn init(&mut self) -> Result<(), ToolingError> {
        if self.baseline.is_some() {
            return Ok(());
        }
        let outcomes = self.engine.analyze_baseline()?;
        self.load_baseline(&outcomes);
        Ok(())
    }

    fn reset(&mut self) {}

    fn select_to_amplify(&mut self, suite: &TestSuite, tests: Vec<TestCase>) -> Vec<TestCase> {
        if self.current_suite.is_none() && !tests.is_empty() {
            self.current_suite = Some(suite.clone());
        }
        tests
    }

    fn select_to_keep(
        &mut self,
        candidates: Vec<TestCase>,
        genealogy: &Genealogy,
    ) -> Vec<TestCase> {
        if candidates.is_empty() {
            return candidates;
        }
        let Some(baseline) = &self.baseline else {
            warn!("no mutation baseline, cannot score candidates");
            return Vec::new();
        };
        let Some(original) = &self.current_suite else {
            warn!("no suite nominated for amplification, cannot score candidates");
            return Vec::new();
        };

        let suite = original
            .without_tests(self.predicate.as_ref())
            .extended_with(&candidates);
        let outcomes = match self.engine.analyze(&suite) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                warn!(
                    error = %e,
                    candidates = candidates.len(),
                    "mutation analysis failed, keeping nothing"
                );
                return Vec::new();
            }
        };
        self.phase = SessionPhase::Scoring;

        if outcomes.len() != baseline.total_mutants {
            warn!(
                generated = outcomes.len(),
                baseline = baseline.total_mutants,
                "mutant count differs from the baseline, matching by identity"
            );
        }

        let candidate_ids: FxHashSet<&TestId> = candidates.iter().map(|c| &c.id).collect();
        let mut selected: FxHashSet<TestId> = FxHashSet::default();
        for outcome in outcomes {
            if !outcome.is_killed() || !baseline.is_creditable(&outcome.mutant) {
                continue;
            }
            let Some(killer) = outcome.killing_test.clone() else {
                continue;
            };
            if !candidate_ids.contains(&killer) {
                continue;
            }
            if !self.kills_more_than_ancestors(&killer, &outcome.mutant, genealogy) {
                debug!(
                    test = %killer,
                    mutant = %outcome.mutant,
                    "an ancestor already kills this mutant"
                );
                continue;
            }
            self.newly_killed
                .entry(killer.clone())
                .or_default()
                .entry(outcome.mutant.clone())
                .or_insert(outcome);
            selected.insert(killer);
        }

        let kept: Vec<TestCase> = candidates
            .into_iter()
            .filter(|c| selected.contains(&c.id))
            .collect();
        for test in &kept {
            debug!(
                test = %test.id,
                mutants = self.newly_killed.get(&test.id).map_or(0, |m| m.len()),
                "candidate kills new mutants"
            );
        }
        kept
    }

    fn update(&mut self) {}

    fn report(&mut self, genealogy: &Genealogy) -> Result<SelectionReport, ReportError> {
        let suite = self
            .current_suite
            .as_ref()
            .map(|s| s.name.clone())
            .ok_or(ReportError::NoActiveSuite)?;
        let kills = self.kill_report(&suite, genealogy);
        let summary = kills.render_text();
        info!("{summary}");
        let artifacts = kills.write(&self.output_dir)?;

        self.current_suite = None;
        self.phase = SessionPhase::Reported;

        Ok(SelectionReport {
            selector: self.name(),
            suite,
            amplified_tests: kills.tests.len(),
            original_killed: kills.original_killed,
            newly_killed: kills.new_mutants_killed(),
            summary,
            artifacts,
        })
    }

    fn amplified_test_count(&self) -> usize {
        self.newly_killed.len()
    }
}
