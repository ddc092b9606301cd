//! Scripted in-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use amplify_core::errors::ToolingError;
use amplify_core::events::*;
use amplify_core::traits::{
    Amplifier, AssertionGenerator, MutationEngine, NamePrefix, TestCompiler, TestHarness,
};
use amplify_core::{
    MutantId, MutantOutcome, MutantState, OutputPaths, TestCase, TestExecutionResult, TestId,
    TestSuite,
};
use amplify_engine::{
    AmplificationOrchestrator, Collaborators, OrchestratorSettings, TestSelector,
};

pub const SUITE: &str = "com.acme.CalcTest";

pub fn tid(method: &str) -> TestId {
    TestId::new(SUITE, method)
}

pub fn test(method: &str, body: &str) -> TestCase {
    TestCase::new(tid(method), body)
}

pub fn mutant(name: &str) -> MutantId {
    MutantId::new("MathMutator", "com.acme.Calc", name, 10)
}

pub fn suite(tests: &[(&str, &str)]) -> TestSuite {
    tests
        .iter()
        .fold(
            TestSuite::new(SUITE).with_fixture("private Calc calc = new Calc();"),
            |s, (name, body)| s.with_method(test(name, body)),
        )
        .with_method(test("setUp", "calc = new Calc();"))
}

// ---------------------------------------------------------------------------
// Mutation engines
// ---------------------------------------------------------------------------

#[derive(Default)]
struct QueueState {
    baseline: Vec<MutantOutcome>,
    replies: VecDeque<Result<Vec<MutantOutcome>, ToolingError>>,
    baseline_calls: usize,
    analyzed: Vec<TestSuite>,
}

/// Replies to `analyze` from a queue, in order. An empty queue answers
/// with no outcomes.
#[derive(Clone, Default)]
pub struct QueuedEngine {
    state: Arc<Mutex<QueueState>>,
}

impl QueuedEngine {
    pub fn new(baseline: Vec<MutantOutcome>) -> Self {
        let engine = Self::default();
        engine.state.lock().unwrap().baseline = baseline;
        engine
    }

    pub fn push(&self, reply: Result<Vec<MutantOutcome>, ToolingError>) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    pub fn push_outcomes(&self, outcomes: Vec<MutantOutcome>) {
        self.push(Ok(outcomes));
    }

    pub fn analyzed(&self) -> Vec<TestSuite> {
        self.state.lock().unwrap().analyzed.clone()
    }

    pub fn baseline_calls(&self) -> usize {
        self.state.lock().unwrap().baseline_calls
    }
}

impl MutationEngine for QueuedEngine {
    fn analyze_baseline(&self) -> Result<Vec<MutantOutcome>, ToolingError> {
        let mut state = self.state.lock().unwrap();
        state.baseline_calls += 1;
        Ok(state.baseline.clone())
    }

    fn analyze(&self, suite: &TestSuite) -> Result<Vec<MutantOutcome>, ToolingError> {
        let mut state = self.state.lock().unwrap();
        state.analyzed.push(suite.clone());
        state.replies.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Kills a mutant with the first test whose body contains the mutant's
/// marker; every other mutant survives.
#[derive(Clone)]
pub struct MarkerEngine {
    baseline: Vec<MutantOutcome>,
    markers: Vec<(MutantId, String)>,
    calls: Arc<AtomicUsize>,
}

impl MarkerEngine {
    pub fn new(baseline: Vec<MutantOutcome>, markers: &[(MutantId, &str)]) -> Self {
        Self {
            baseline,
            markers: markers
                .iter()
                .map(|(m, marker)| (m.clone(), marker.to_string()))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MutationEngine for MarkerEngine {
    fn analyze_baseline(&self) -> Result<Vec<MutantOutcome>, ToolingError> {
        Ok(self.baseline.clone())
    }

    fn analyze(&self, suite: &TestSuite) -> Result<Vec<MutantOutcome>, ToolingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .baseline
            .iter()
            .map(|b| {
                let killer = self
                    .markers
                    .iter()
                    .find(|(m, _)| m == &b.mutant)
                    .and_then(|(_, marker)| {
                        suite.methods.iter().find(|t| t.body.contains(marker.as_str()))
                    });
                match killer {
                    Some(t) => MutantOutcome::killed_by(b.mutant.clone(), t.id.clone()),
                    None => MutantOutcome::new(b.mutant.clone(), MutantState::Survived, None),
                }
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Compiler and harness
// ---------------------------------------------------------------------------

/// Fails when any method body contains `COMPILE_ERROR`.
#[derive(Clone, Default)]
pub struct MarkerCompiler {
    calls: Arc<AtomicUsize>,
}

impl MarkerCompiler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TestCompiler for MarkerCompiler {
    fn compile(&self, suite: &TestSuite, _output: &OutputPaths) -> Result<(), ToolingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if suite.methods.iter().any(|m| m.body.contains("COMPILE_ERROR")) {
            return Err(ToolingError::CompilationFailed {
                suite: suite.name.clone(),
                message: "cannot find symbol".to_string(),
            });
        }
        Ok(())
    }
}

/// Bodies containing `FAIL` fail, bodies containing `SKIP` never run,
/// everything else passes.
#[derive(Clone, Default)]
pub struct MarkerHarness {
    runs: Arc<Mutex<Vec<Vec<TestId>>>>,
}

impl MarkerHarness {
    /// Tests submitted per run, in call order.
    pub fn runs(&self) -> Vec<Vec<TestId>> {
        self.runs.lock().unwrap().clone()
    }
}

impl TestHarness for MarkerHarness {
    fn run(
        &self,
        _suite: &TestSuite,
        tests: &[TestCase],
        _classpath: &str,
    ) -> Result<TestExecutionResult, ToolingError> {
        self.runs
            .lock()
            .unwrap()
            .push(tests.iter().map(|t| t.id.clone()).collect());
        let ran: Vec<TestId> = tests
            .iter()
            .filter(|t| !t.body.contains("SKIP"))
            .map(|t| t.id.clone())
            .collect();
        let failed: Vec<TestId> = tests
            .iter()
            .filter(|t| t.body.contains("FAIL"))
            .map(|t| t.id.clone())
            .collect();
        Ok(TestExecutionResult::new(ran, failed))
    }
}

/// Harness answering every run with the same result.
pub struct FixedHarness(pub TestExecutionResult);

impl TestHarness for FixedHarness {
    fn run(
        &self,
        _suite: &TestSuite,
        _tests: &[TestCase],
        _classpath: &str,
    ) -> Result<TestExecutionResult, ToolingError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Amplifiers and assertion generators
// ---------------------------------------------------------------------------

/// Amplifier backed by a closure; records which tests it was applied to.
pub struct FnAmplifier<F> {
    apply: F,
    applied: Arc<Mutex<Vec<TestId>>>,
}

impl<F> FnAmplifier<F>
where
    F: Fn(&TestCase) -> Vec<TestCase> + Send + Sync,
{
    pub fn new(apply: F) -> Self {
        Self {
            apply,
            applied: Arc::default(),
        }
    }

    pub fn applied_handle(&self) -> Arc<Mutex<Vec<TestId>>> {
        self.applied.clone()
    }
}

impl<F> Amplifier for FnAmplifier<F>
where
    F: Fn(&TestCase) -> Vec<TestCase> + Send + Sync,
{
    fn name(&self) -> &str {
        "fn-amplifier"
    }

    fn apply(&self, test: &TestCase) -> Vec<TestCase> {
        self.applied.lock().unwrap().push(test.id.clone());
        (self.apply)(test)
    }

    fn reset(&mut self, _suite: &TestSuite) {}
}

/// One child per test: `<name>_1` with ` step();` appended to the body.
pub fn stepping_amplifier() -> FnAmplifier<impl Fn(&TestCase) -> Vec<TestCase> + Send + Sync> {
    FnAmplifier::new(|t: &TestCase| {
        vec![test(
            &format!("{}_1", t.name()),
            &format!("{} step();", t.body),
        )]
    })
}

/// Children with fixed body suffixes: `<name>_<i>` gets `suffixes[i]`.
pub fn suffix_amplifier(
    suffixes: &'static [&'static str],
) -> FnAmplifier<impl Fn(&TestCase) -> Vec<TestCase> + Send + Sync> {
    FnAmplifier::new(move |t: &TestCase| {
        suffixes
            .iter()
            .enumerate()
            .map(|(i, suffix)| {
                test(&format!("{}_{}", t.name(), i + 1), &format!("{} {suffix}", t.body))
            })
            .collect()
    })
}

/// Never adds an assertion.
pub struct NoAssertions;

impl AssertionGenerator for NoAssertions {
    fn generate_assertions(&self, _suite: &TestSuite, _tests: &[TestCase]) -> Vec<TestCase> {
        Vec::new()
    }
}

/// Appends one assertion to every test, under a new `<name>_assert` identity.
pub struct AppendAssertion;

impl AssertionGenerator for AppendAssertion {
    fn generate_assertions(&self, _suite: &TestSuite, tests: &[TestCase]) -> Vec<TestCase> {
        tests
            .iter()
            .map(|t| {
                test(&format!("{}_assert", t.name()), &format!("{} assertTrue(calc.ok());", t.body))
                    .derived_from(&t.id)
                    .with_additions(1, 0)
            })
            .collect()
    }
}

/// Hands every test back unchanged under a new `<name>_same` identity.
pub struct SameBodyAssertion;

impl AssertionGenerator for SameBodyAssertion {
    fn generate_assertions(&self, _suite: &TestSuite, tests: &[TestCase]) -> Vec<TestCase> {
        tests
            .iter()
            .map(|t| test(&format!("{}_same", t.name()), &t.body).derived_from(&t.id))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingHandler {
    pub excluded: Mutex<Vec<TestId>>,
    pub skipped: Mutex<Vec<SkipReason>>,
    pub kept: Mutex<Vec<TestId>>,
    pub completed: AtomicUsize,
}

impl AmplifyEventHandler for RecordingHandler {
    fn on_seed_excluded(&self, event: &SeedExcludedEvent) {
        self.excluded.lock().unwrap().push(event.test.clone());
    }

    fn on_iteration_skipped(&self, event: &IterationSkippedEvent) {
        self.skipped.lock().unwrap().push(event.reason);
    }

    fn on_tests_kept(&self, event: &TestsKeptEvent) {
        self.kept.lock().unwrap().extend(event.kept.iter().cloned());
    }

    fn on_suite_complete(&self, _event: &SuiteCompleteEvent) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub fn orchestrator(
    amplifiers: Vec<Box<dyn Amplifier>>,
    assertion_generator: Box<dyn AssertionGenerator>,
    compiler: Box<dyn TestCompiler>,
    harness: Box<dyn TestHarness>,
    selector: Box<dyn TestSelector>,
) -> AmplificationOrchestrator {
    AmplificationOrchestrator::new(
        Collaborators {
            amplifiers,
            assertion_generator,
            compiler,
            harness,
            predicate: Arc::new(NamePrefix::default()),
        },
        selector,
        OrchestratorSettings::default(),
    )
}
