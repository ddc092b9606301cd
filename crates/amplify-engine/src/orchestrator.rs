//! The amplification loop.
//!
//! For each seed test: nominate, expand, inject assertions, compile, run,
//! filter out failures, let the selector decide, repeat. Failures inside an
//! iteration never abort the suite; the batch is dropped and the loop moves on.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use amplify_core::config::AmplifyConfig;
use amplify_core::constants::DEFAULT_MAX_ITERATIONS;
use amplify_core::errors::{ReportError, ToolingError};
use amplify_core::events::{
    AmplifyEventHandler, EventDispatcher, IterationSkippedEvent, SeedExcludedEvent, SkipReason,
    SuiteCompleteEvent, SuiteStartedEvent, TestsKeptEvent,
};
use amplify_core::traits::{Amplifier, AssertionGenerator, TestCompiler, TestHarness, TestPredicate};
use amplify_core::{OutputPaths, TestCase, TestExecutionResult, TestId, TestSuite};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::genealogy::Genealogy;
use crate::selection::{SelectionReport, TestSelector};

/// External collaborators driven by the loop.
pub struct Collaborators {
    pub amplifiers: Vec<Box<dyn Amplifier>>,
    pub assertion_generator: Box<dyn AssertionGenerator>,
    pub compiler: Box<dyn TestCompiler>,
    pub harness: Box<dyn TestHarness>,
    pub predicate: Arc<dyn TestPredicate>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub output_paths: OutputPaths,
    pub classpath: String,
    /// One round of assertion injection on the seed tests before the loop.
    pub pre_amplification: bool,
    /// Iteration budget per seed test used by [`AmplificationOrchestrator::run`].
    pub max_iterations: u32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            output_paths: OutputPaths::default(),
            classpath: String::new(),
            pre_amplification: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &AmplifyConfig) -> Self {
        Self {
            output_paths: config.execution.output_paths(),
            classpath: config.execution.effective_classpath(),
            pre_amplification: config.amplification.effective_pre_amplification(),
            max_iterations: config.amplification.effective_max_iterations(),
        }
    }
}

/// Counters for one orchestrator's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub suites_amplified: usize,
    pub amplified_tests: usize,
    pub compile_failures: usize,
    pub execution_failures: usize,
    pub failing_candidates: usize,
}

/// An amplified suite together with the selector's report on it.
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub suite: TestSuite,
    pub report: Option<SelectionReport>,
}

/// Why a compile-and-run step produced no usable result.
#[derive(Debug)]
enum BatchFailure {
    Compile(ToolingError),
    Execution(ToolingError),
    Incomplete { ran: usize, submitted: usize },
}

impl BatchFailure {
    fn reason(&self) -> SkipReason {
        match self {
            Self::Compile(_) => SkipReason::CompilationFailed,
            Self::Execution(_) => SkipReason::ExecutionFailed,
            Self::Incomplete { .. } => SkipReason::IncompleteRun,
        }
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile(e) | Self::Execution(e) => write!(f, "{e}"),
            Self::Incomplete { ran, submitted } => {
                write!(f, "only {ran} of {submitted} tests ran")
            }
        }
    }
}

pub struct AmplificationOrchestrator {
    collaborators: Collaborators,
    selector: Box<dyn TestSelector>,
    settings: OrchestratorSettings,
    genealogy: Genealogy,
    stats: RunStats,
    events: EventDispatcher,
}

impl AmplificationOrchestrator {
    pub fn new(
        collaborators: Collaborators,
        selector: Box<dyn TestSelector>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            collaborators,
            selector,
            settings,
            genealogy: Genealogy::new(),
            stats: RunStats::default(),
            events: EventDispatcher::new(),
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a lifecycle event handler.
    pub fn with_event_handler(mut self, handler: Arc<dyn AmplifyEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    pub fn genealogy(&self) -> &Genealogy {
        &self.genealogy
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn selector(&self) -> &dyn TestSelector {
        self.selector.as_ref()
    }

    /// Amplify `seed_tests` of `suite`, running at most `max_iterations`
    /// rounds per seed test.
    ///
    /// Returns the suite extended with every kept test, or `None` when the
    /// suite has no test to amplify or cannot be made green.
    pub fn amplify(
        &mut self,
        suite: &TestSuite,
        seed_tests: &[TestCase],
        max_iterations: u32,
    ) -> Option<TestSuite> {
        let tests: Vec<TestCase> = seed_tests
            .iter()
            .filter(|t| self.collaborators.predicate.is_test(t))
            .cloned()
            .collect();
        if tests.is_empty() {
            info!(suite = %suite.name, "no test to amplify");
            return None;
        }

        let started = Instant::now();
        info!(suite = %suite.name, tests = tests.len(), max_iterations, "amplification started");
        self.events.emit_suite_started(&SuiteStartedEvent {
            suite: suite.name.clone(),
            seed_tests: tests.len(),
            max_iterations,
        });

        if let Err(e) = self.selector.init() {
            warn!(suite = %suite.name, error = %e, "selector could not be initialized");
            return None;
        }
        self.genealogy.clear();
        self.selector.reset();

        let green = self.preflight(suite, tests)?;
        for amplifier in &mut self.collaborators.amplifiers {
            amplifier.reset(suite);
        }

        let mut amplified = Vec::new();
        if self.settings.pre_amplification {
            let kept = self.pre_amplify(suite, &green);
            self.accumulate(&mut amplified, kept);
        }

        for (i, seed) in green.iter().enumerate() {
            debug!(test = %seed.id, index = i + 1, total = green.len(), "amplifying seed test");
            self.selector.reset();
            match self.compile_and_run(suite, std::slice::from_ref(seed)) {
                Ok(result) if result.is_green() => {
                    let kept = self.amplify_seed(suite, seed, max_iterations);
                    self.accumulate(&mut amplified, kept);
                }
                Ok(_) => debug!(test = %seed.id, "seed test fails on its own, skipping"),
                Err(failure) => debug!(
                    test = %seed.id,
                    error = %failure,
                    "seed test could not be run, skipping"
                ),
            }
        }

        self.stats.suites_amplified += 1;
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            suite = %suite.name,
            amplified = amplified.len(),
            duration_ms,
            "amplification complete"
        );
        self.events.emit_suite_complete(&SuiteCompleteEvent {
            suite: suite.name.clone(),
            amplified_tests: amplified.len(),
            duration_ms,
        });

        Some(suite.extended_with(&amplified))
    }

    /// Amplify every test of `suite`, then close the selector's session with
    /// a report. `Ok(None)` when there was nothing to amplify.
    pub fn run_suite(
        &mut self,
        suite: &TestSuite,
        max_iterations: u32,
    ) -> Result<Option<SuiteOutcome>, ReportError> {
        let Some(amplified) = self.amplify(suite, &suite.methods, max_iterations) else {
            return Ok(None);
        };
        let report = match self.report() {
            Ok(report) => Some(report),
            // No test was ever nominated, so the selector has no session.
            Err(ReportError::NoActiveSuite) => None,
            Err(e) => return Err(e),
        };
        Ok(Some(SuiteOutcome {
            suite: amplified,
            report,
        }))
    }

    /// [`Self::run_suite`] with the configured iteration budget.
    pub fn run(&mut self, suite: &TestSuite) -> Result<Option<SuiteOutcome>, ReportError> {
        self.run_suite(suite, self.settings.max_iterations)
    }

    /// Have the selector report on the current suite.
    pub fn report(&mut self) -> Result<SelectionReport, ReportError> {
        self.selector.report(&self.genealogy)
    }

    /// Drop failing seed tests until the rest pass together.
    ///
    /// Each narrowing step removes at least one test, so this takes at most
    /// `tests.len()` steps.
    fn preflight(&mut self, suite: &TestSuite, mut tests: Vec<TestCase>) -> Option<Vec<TestCase>> {
        loop {
            if tests.is_empty() {
                warn!(suite = %suite.name, "no passing seed test left");
                return None;
            }
            let result = match self.compile_and_run(suite, &tests) {
                Ok(result) => result,
                Err(failure) => {
                    warn!(
                        suite = %suite.name,
                        error = %failure,
                        "a green test suite is needed to amplify"
                    );
                    return None;
                }
            };
            if result.failures.is_empty() {
                return Some(tests);
            }

            warn!(
                suite = %suite.name,
                failures = result.failures.len(),
                "seed tests fail before amplification, discarding them"
            );
            let before = tests.len();
            tests.retain(|t| {
                let failed = result.has_failed(&t.id);
                if failed {
                    warn!(test = %t.id, "excluding failing seed test");
                    self.events.emit_seed_excluded(&SeedExcludedEvent {
                        suite: suite.name.clone(),
                        test: t.id.clone(),
                    });
                }
                !failed
            });
            if tests.len() == before {
                warn!(suite = %suite.name, "failures name no seed test, giving up");
                return None;
            }
        }
    }

    /// One round of assertion injection on the green seed tests.
    fn pre_amplify(&mut self, suite: &TestSuite, seeds: &[TestCase]) -> Vec<TestCase> {
        debug!(suite = %suite.name, "adding assertions before amplification");
        self.selector.update();
        let nominated = self.selector.select_to_amplify(suite, seeds.to_vec());
        if nominated.is_empty() {
            return Vec::new();
        }

        let improved: Vec<TestCase> = self
            .collaborators
            .assertion_generator
            .generate_assertions(suite, &nominated)
            .into_iter()
            .filter(|t| !t.has_empty_body())
            .filter(|t| !seeds.iter().any(|s| s.same_body(t)))
            .collect();
        let improved: Vec<TestCase> = improved
            .into_iter()
            .filter(|t| is_new_to(suite, t) && self.adopt(t, None))
            .collect();
        if improved.is_empty() {
            return Vec::new();
        }
        self.selector.select_to_keep(improved, &self.genealogy)
    }

    /// The iteration loop for one seed test. Returns the kept tests.
    fn amplify_seed(
        &mut self,
        suite: &TestSuite,
        seed: &TestCase,
        max_iterations: u32,
    ) -> Vec<TestCase> {
        let mut working = vec![seed.clone()];
        let mut amplified = Vec::new();

        for iteration in 0..max_iterations {
            debug!(test = %seed.id, iteration, "iteration");
            let nominated = self.selector.select_to_amplify(suite, working.clone());
            if nominated.is_empty() {
                debug!(test = %seed.id, iteration, "no test selected for amplification");
                self.skip(seed, iteration, SkipReason::NothingNominated);
                break;
            }
            debug!(
                nominated = nominated.len(),
                available = working.len(),
                "tests selected for amplification"
            );

            let candidates = self.expand(suite, &nominated);
            if candidates.is_empty() {
                debug!(test = %seed.id, iteration, "amplifiers produced no candidate");
                self.skip(seed, iteration, SkipReason::NoCandidates);
                break;
            }
            let candidates = self.inject_assertions(suite, candidates);

            let result = match self.compile_and_run(suite, &candidates) {
                Ok(result) => result,
                Err(failure) => {
                    warn!(
                        test = %seed.id,
                        iteration,
                        candidates = candidates.len(),
                        error = %failure,
                        "dropping candidate batch"
                    );
                    self.skip(seed, iteration, failure.reason());
                    working = nominated;
                    continue;
                }
            };

            let generated = candidates.len();
            let passing: Vec<TestCase> = candidates
                .into_iter()
                .filter(|c| result.passed(&c.id))
                .collect();
            if passing.len() < generated {
                let discarded = generated - passing.len();
                self.stats.failing_candidates += discarded;
                warn!(test = %seed.id, iteration, discarded, "discarding failing candidates");
            }
            debug!(passing = passing.len(), "candidates compiled and passed");

            let kept = self.selector.select_to_keep(passing.clone(), &self.genealogy);
            self.events.emit_tests_kept(&TestsKeptEvent {
                seed_test: seed.id.clone(),
                iteration,
                candidates: passing.len(),
                kept: kept.iter().map(|t| t.id.clone()).collect(),
            });
            debug!(kept = kept.len(), "candidates kept");
            amplified.extend(kept);
            working = passing;
        }
        amplified
    }

    /// Apply every amplifier to every nominated test, dedup by body, and
    /// record lineage. Children reusing a method name of `suite` are dropped.
    fn expand(&mut self, suite: &TestSuite, nominated: &[TestCase]) -> Vec<TestCase> {
        let mut generated = Vec::new();
        for test in nominated {
            for amplifier in &self.collaborators.amplifiers {
                let children = amplifier.apply(test);
                debug!(
                    amplifier = amplifier.name(),
                    test = %test.id,
                    children = children.len(),
                    "amplifier applied"
                );
                generated.extend(
                    children
                        .into_iter()
                        .filter(|c| !c.has_empty_body() && is_new_to(suite, c))
                        .map(|c| (c, test.id.clone())),
                );
            }
        }

        let candidates: Vec<TestCase> = reduce_pairs(generated)
            .into_iter()
            .filter(|(child, parent)| self.adopt(child, Some(parent)))
            .map(|(child, _)| child)
            .collect();
        debug!(candidates = candidates.len(), "new tests generated");
        candidates
    }

    /// Let the assertion generator strengthen `candidates`. If it returns
    /// nothing usable the un-asserted candidates go on.
    fn inject_assertions(&mut self, suite: &TestSuite, candidates: Vec<TestCase>) -> Vec<TestCase> {
        let asserted: Vec<TestCase> = self
            .collaborators
            .assertion_generator
            .generate_assertions(suite, &candidates)
            .into_iter()
            .filter(|t| !t.has_empty_body())
            .collect();
        let asserted: Vec<TestCase> = asserted
            .into_iter()
            .filter(|t| is_new_to(suite, t) && self.adopt(t, None))
            .collect();
        if asserted.is_empty() {
            debug!("no assertion added, keeping raw candidates");
            return candidates;
        }
        asserted
    }

    /// Record `test`'s lineage. Its own `derived_from` hint wins over
    /// `default_parent`; a test already in the table keeps its parent.
    /// Returns false when the edge is inconsistent and the test must go.
    fn adopt(&mut self, test: &TestCase, default_parent: Option<&TestId>) -> bool {
        let parent = test
            .derived_from
            .as_ref()
            .filter(|p| **p != test.id)
            .or(default_parent)
            .or_else(|| self.genealogy.parent_of(&test.id))
            .cloned();
        let Some(parent) = parent else {
            return true;
        };
        match self.genealogy.record(test, &parent) {
            Ok(()) => true,
            Err(e) => {
                warn!(test = %test.id, error = %e, "dropping test with inconsistent lineage");
                false
            }
        }
    }

    /// Compile the suite extended with `tests` and run `tests`.
    fn compile_and_run(
        &mut self,
        suite: &TestSuite,
        tests: &[TestCase],
    ) -> Result<TestExecutionResult, BatchFailure> {
        let candidate_suite = self.selector.build_suite_for_selection(suite, tests);
        if let Err(e) = self
            .collaborators
            .compiler
            .compile(&candidate_suite, &self.settings.output_paths)
        {
            self.stats.compile_failures += 1;
            return Err(BatchFailure::Compile(e));
        }

        let result = match self.collaborators.harness.run(
            &candidate_suite,
            tests,
            &self.settings.classpath,
        ) {
            Ok(result) => result,
            Err(e) => {
                self.stats.execution_failures += 1;
                return Err(BatchFailure::Execution(e));
            }
        };
        if result.tests_run.len() < tests.len() {
            self.stats.execution_failures += 1;
            return Err(BatchFailure::Incomplete {
                ran: result.tests_run.len(),
                submitted: tests.len(),
            });
        }
        self.selector.update();
        Ok(result)
    }

    fn accumulate(&mut self, amplified: &mut Vec<TestCase>, kept: Vec<TestCase>) {
        self.stats.amplified_tests += kept.len();
        amplified.extend(kept);
        debug!(
            total = amplified.len(),
            selector_total = self.selector.amplified_test_count(),
            "amplified tests so far"
        );
    }

    fn skip(&self, seed: &TestCase, iteration: u32, reason: SkipReason) {
        self.events.emit_iteration_skipped(&IterationSkippedEvent {
            seed_test: seed.id.clone(),
            iteration,
            reason,
        });
    }
}

/// False, with a warning, when `test` reuses the identity of a method
/// already in `suite`. Such a test would never be compiled in its own right.
fn is_new_to(suite: &TestSuite, test: &TestCase) -> bool {
    if suite.contains(&test.id) {
        warn!(test = %test.id, "dropping generated test that shadows an existing method");
        return false;
    }
    true
}

/// Drop syntactically identical tests, keeping the first occurrence. Tests
/// sharing an identity are duplicates too.
pub fn reduce(tests: Vec<TestCase>) -> Vec<TestCase> {
    reduce_by(tests, |t| t)
}

fn reduce_pairs(pairs: Vec<(TestCase, TestId)>) -> Vec<(TestCase, TestId)> {
    reduce_by(pairs, |(t, _)| t)
}

fn reduce_by<T>(items: Vec<T>, test_of: impl Fn(&T) -> &TestCase) -> Vec<T> {
    let mut ids = FxHashSet::default();
    let mut bodies = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| {
            let test = test_of(item);
            let body = test.body.trim();
            if ids.contains(&test.id) || bodies.contains(body) {
                return false;
            }
            ids.insert(test.id.clone());
            bodies.insert(body.to_string());
            true
        })
        .collect()
}
