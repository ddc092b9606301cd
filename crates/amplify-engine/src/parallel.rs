//! Amplify several seed suites at once, one orchestrator per suite.
//!
//! Orchestrators share nothing: each is built by the caller's factory with
//! its own selector, genealogy, and working directories.

use std::time::Instant;

use amplify_core::errors::ReportError;
use amplify_core::TestSuite;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::orchestrator::{AmplificationOrchestrator, SuiteOutcome};

/// Result of amplifying one suite.
#[derive(Debug)]
pub struct SuiteRun {
    pub suite: String,
    pub outcome: Result<Option<SuiteOutcome>, ReportError>,
}

/// Run `factory(suite).run_suite(suite, max_iterations)` for every suite in
/// parallel. Results come back in input order.
///
/// `threads == 0` uses rayon's global pool.
pub fn amplify_suites_parallel<F>(
    suites: &[TestSuite],
    max_iterations: u32,
    threads: usize,
    factory: F,
) -> Vec<SuiteRun>
where
    F: Fn(&TestSuite) -> AmplificationOrchestrator + Sync,
{
    let start = Instant::now();
    let run_all = || -> Vec<SuiteRun> {
        suites
            .par_iter()
            .map(|suite| {
                let mut orchestrator = factory(suite);
                SuiteRun {
                    suite: suite.name.clone(),
                    outcome: orchestrator.run_suite(suite, max_iterations),
                }
            })
            .collect()
    };

    let runs = if threads > 0 {
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(run_all),
            Err(e) => {
                warn!(error = %e, threads, "could not build thread pool, using the global pool");
                run_all()
            }
        }
    } else {
        run_all()
    };

    let failed = runs.iter().filter(|r| r.outcome.is_err()).count();
    info!(
        suites = runs.len(),
        failed,
        duration_ms = start.elapsed().as_millis() as u64,
        "parallel amplification complete"
    );
    runs
}
