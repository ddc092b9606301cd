mod common;

use std::sync::Arc;

use amplify_core::errors::ToolingError;
use amplify_core::traits::NamePrefix;
use amplify_core::{MutantOutcome, MutantState, TestCase};
use amplify_engine::selection::SessionPhase;
use amplify_engine::{Genealogy, MutationScoreSelector, TestSelector};
use proptest::prelude::*;

use common::*;

/// Baseline: m1 killed by testA, m2 and m3 survive, m4 timed out.
fn baseline() -> Vec<MutantOutcome> {
    vec![
        MutantOutcome::killed_by(mutant("m1"), tid("testA")),
        MutantOutcome::new(mutant("m2"), MutantState::Survived, None),
        MutantOutcome::new(mutant("m3"), MutantState::NoCoverage, None),
        MutantOutcome::new(mutant("m4"), MutantState::TimedOut, None),
    ]
}

fn selector(engine: &QueuedEngine) -> MutationScoreSelector {
    let mut s = MutationScoreSelector::new(
        Box::new(engine.clone()),
        Arc::new(NamePrefix::default()),
        std::env::temp_dir(),
    );
    s.init().unwrap();
    let seed = suite(&[("testA", "a();")]);
    s.select_to_amplify(&seed, seed.tests(&NamePrefix::default()));
    s
}

fn child(name: &str, parent: &str, genealogy: &mut Genealogy) -> TestCase {
    let t = test(name, &format!("{name}();"));
    genealogy.record(&t, &tid(parent)).unwrap();
    t
}

/// Outcomes mirroring the baseline except for the given kills.
fn kills(killed: &[(&str, &str)]) -> Vec<MutantOutcome> {
    baseline()
        .into_iter()
        .map(|b| {
            match killed.iter().find(|(m, _)| mutant(m) == b.mutant) {
                Some((_, by)) => MutantOutcome::killed_by(b.mutant, tid(by)),
                None => b,
            }
        })
        .collect()
}

#[test]
fn child_killing_survivor_is_kept() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);

    engine.push_outcomes(kills(&[("m2", "t1")]));
    let kept = s.select_to_keep(vec![t1.clone()], &g);

    assert_eq!(kept, vec![t1]);
    assert_eq!(s.credited_mutants(&tid("t1")), vec![mutant("m2")]);
    assert_eq!(s.phase(), SessionPhase::Scoring);
}

#[test]
fn grandchild_gets_no_credit_for_ancestor_kill() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);
    let t2 = child("t2", "t1", &mut g);

    engine.push_outcomes(kills(&[("m2", "t1")]));
    s.select_to_keep(vec![t1], &g);

    engine.push_outcomes(kills(&[("m2", "t2")]));
    let kept = s.select_to_keep(vec![t2.clone()], &g);
    assert!(kept.is_empty());
    assert!(s.credited_mutants(&tid("t2")).is_empty());

    // A genuinely new kill still counts, and only that one is credited.
    engine.push_outcomes(kills(&[("m2", "t2"), ("m3", "t2")]));
    let kept = s.select_to_keep(vec![t2.clone()], &g);
    assert_eq!(kept, vec![t2]);
    assert_eq!(s.credited_mutants(&tid("t2")), vec![mutant("m3")]);
    assert_eq!(s.amplified_test_count(), 2);
}

#[test]
fn baseline_kills_and_unreliable_mutants_are_never_credited() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);

    engine.push_outcomes(kills(&[("m1", "t1"), ("m4", "t1")]));
    let kept = s.select_to_keep(vec![t1], &g);

    assert!(kept.is_empty());
    assert!(s.newly_killed().is_empty());
}

#[test]
fn kills_by_non_candidates_are_ignored() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);

    engine.push_outcomes(kills(&[("m2", "setUp")]));
    assert!(s.select_to_keep(vec![t1], &g).is_empty());
}

#[test]
fn empty_candidates_are_a_no_op() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let phase = s.phase();

    assert!(s.select_to_keep(Vec::new(), &Genealogy::new()).is_empty());

    assert!(engine.analyzed().is_empty());
    assert!(s.newly_killed().is_empty());
    assert_eq!(s.phase(), phase);
}

#[test]
fn credits_only_grow_across_calls() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);
    let u1 = child("u1", "testA", &mut g);

    engine.push_outcomes(kills(&[("m2", "t1")]));
    s.select_to_keep(vec![t1.clone()], &g);
    let before = s.newly_killed().clone();

    // A later run crediting a different test for the same mutant neither
    // removes nor overwrites the earlier entry.
    engine.push_outcomes(kills(&[("m2", "u1"), ("m3", "t1")]));
    s.select_to_keep(vec![u1, t1], &g);

    for (test, credits) in &before {
        for (mutant, outcome) in credits {
            assert_eq!(s.newly_killed()[test].get(mutant), Some(outcome));
        }
    }
    assert_eq!(s.credited_mutants(&tid("t1")), vec![mutant("m2"), mutant("m3")]);
    assert_eq!(s.credited_mutants(&tid("u1")), vec![mutant("m2")]);
}

#[test]
fn baseline_is_idempotent() {
    let engine = QueuedEngine::new(baseline());
    let mut s = MutationScoreSelector::new(
        Box::new(engine.clone()),
        Arc::new(NamePrefix::default()),
        std::env::temp_dir(),
    );
    assert_eq!(s.phase(), SessionPhase::Uninitialized);
    s.init().unwrap();
    let first = s.baseline().cloned();
    s.init().unwrap();
    assert_eq!(engine.baseline_calls(), 1);

    s.load_baseline(&baseline());
    assert_eq!(s.baseline().cloned(), first);
    let b = first.unwrap();
    assert_eq!(b.original_killed().len(), 1);
    assert_eq!(b.never_exercised().len(), 1);
    assert_eq!(s.phase(), SessionPhase::Baselined);
}

#[test]
fn count_mismatch_still_matches_by_identity() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);

    engine.push_outcomes(vec![MutantOutcome::killed_by(mutant("m2"), tid("t1"))]);
    assert_eq!(s.select_to_keep(vec![t1.clone()], &g), vec![t1]);
}

#[test]
fn tooling_failure_keeps_nothing_and_changes_nothing() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);

    engine.push(Err(ToolingError::AnalysisFailed {
        message: "pit crashed".to_string(),
    }));
    assert!(s.select_to_keep(vec![t1], &g).is_empty());
    assert!(s.newly_killed().is_empty());
    assert_eq!(s.phase(), SessionPhase::Baselined);
}

#[test]
fn scoring_without_baseline_keeps_nothing() {
    let engine = QueuedEngine::new(baseline());
    let mut s = MutationScoreSelector::new(
        Box::new(engine.clone()),
        Arc::new(NamePrefix::default()),
        std::env::temp_dir(),
    );
    let seed = suite(&[("testA", "a();")]);
    s.select_to_amplify(&seed, seed.tests(&NamePrefix::default()));
    assert!(s
        .select_to_keep(vec![test("t1", "t1();")], &Genealogy::new())
        .is_empty());
    assert!(engine.analyzed().is_empty());
}

#[test]
fn analyzed_suite_holds_only_candidates_and_fixtures() {
    let engine = QueuedEngine::new(baseline());
    let mut s = selector(&engine);
    let mut g = Genealogy::new();
    let t1 = child("t1", "testA", &mut g);

    s.select_to_keep(vec![t1], &g);

    let analyzed = engine.analyzed();
    assert_eq!(analyzed.len(), 1);
    let names: Vec<&str> = analyzed[0].methods.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["setUp", "t1"]);
    assert_eq!(analyzed[0].fixtures.len(), 1);
}

proptest! {
    /// Along any derivation chain, each mutant is credited to at most one
    /// test, and never to a test when the original suite already kills it.
    #[test]
    fn no_double_credit_along_chains(
        kills_per_generation in prop::collection::vec(
            prop::collection::vec(0usize..4, 0..4),
            1..6,
        )
    ) {
        let engine = QueuedEngine::new(baseline());
        let mut s = selector(&engine);
        let mut g = Genealogy::new();
        let names = ["m1", "m2", "m3", "m4"];

        let mut parent = "testA".to_string();
        let mut chain = Vec::new();
        for (i, killed) in kills_per_generation.iter().enumerate() {
            let name = format!("t{i}");
            let t = child(&name, &parent, &mut g);
            let pairs: Vec<(&str, &str)> =
                killed.iter().map(|k| (names[*k], name.as_str())).collect();
            engine.push_outcomes(kills(&pairs));
            s.select_to_keep(vec![t], &g);
            chain.push(tid(&name));
            parent = name;
        }

        for m in names {
            let credited = chain
                .iter()
                .filter(|t| s.credited_mutants(t).contains(&mutant(m)))
                .count();
            prop_assert!(credited <= 1, "{m} credited {credited} times");
        }
        for t in &chain {
            prop_assert!(!s.credited_mutants(t).contains(&mutant("m1")));
            prop_assert!(!s.credited_mutants(t).contains(&mutant("m4")));
        }
    }
}
