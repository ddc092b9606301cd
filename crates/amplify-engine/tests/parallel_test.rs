mod common;

use std::sync::Arc;

use amplify_core::traits::NamePrefix;
use amplify_core::{MutantOutcome, MutantState, TestSuite};
use amplify_engine::{amplify_suites_parallel, MutationScoreSelector, TakeAllSelector};

use common::*;

fn named_suite(name: &str) -> TestSuite {
    let s = TestSuite::new(name);
    let t = amplify_core::TestCase::new(s.test_id("testA"), "a();");
    s.with_method(t)
}

#[test]
fn each_suite_gets_its_own_orchestrator() {
    let suites = vec![
        named_suite("com.acme.ATest"),
        named_suite("com.acme.BTest"),
        TestSuite::new("com.acme.Empty"),
    ];

    let runs = amplify_suites_parallel(&suites, 1, 2, |_suite| {
        orchestrator(
            vec![Box::new(FnAmplifier::new(|t: &amplify_core::TestCase| {
                vec![amplify_core::TestCase::new(
                    amplify_core::TestId::new(t.id.suite.clone(), format!("{}_1", t.name())),
                    format!("{} step();", t.body),
                )]
            }))],
            Box::new(NoAssertions),
            Box::new(MarkerCompiler::default()),
            Box::new(MarkerHarness::default()),
            Box::new(TakeAllSelector::new()),
        )
    });

    let names: Vec<&str> = runs.iter().map(|r| r.suite.as_str()).collect();
    assert_eq!(names, vec!["com.acme.ATest", "com.acme.BTest", "com.acme.Empty"]);

    for run in &runs[..2] {
        let outcome = run.outcome.as_ref().unwrap().as_ref().expect("amplified");
        assert_eq!(outcome.suite.methods.len(), 2);
        assert_eq!(outcome.report.as_ref().unwrap().amplified_tests, 1);
    }
    assert!(matches!(runs[2].outcome, Ok(None)));
}

#[test]
fn mutation_reports_land_per_suite() {
    let out = tempfile::tempdir().unwrap();
    let suites = vec![named_suite("com.acme.ATest"), named_suite("com.acme.BTest")];

    let runs = amplify_suites_parallel(&suites, 1, 0, |suite| {
        let m = mutant("m2");
        let engine = MarkerEngine::new(
            vec![MutantOutcome::new(m.clone(), MutantState::Survived, None)],
            &[(m, "step();")],
        );
        let selector = MutationScoreSelector::new(
            Box::new(engine),
            Arc::new(NamePrefix::default()),
            out.path().join(&suite.name),
        );
        orchestrator(
            vec![Box::new(FnAmplifier::new(|t: &amplify_core::TestCase| {
                vec![amplify_core::TestCase::new(
                    amplify_core::TestId::new(t.id.suite.clone(), format!("{}_1", t.name())),
                    format!("{} step();", t.body),
                )]
            }))],
            Box::new(NoAssertions),
            Box::new(MarkerCompiler::default()),
            Box::new(MarkerHarness::default()),
            Box::new(selector),
        )
    });

    assert!(runs.iter().all(|r| r.outcome.is_ok()));
    for suite in &suites {
        let dir = out.path().join(&suite.name);
        assert!(dir.join(format!("{}_mutants_report.txt", suite.name)).exists());
        assert!(dir.join(format!("{}_mutants_killed.json", suite.name)).exists());
    }
}
