//! Mutant outcome records produced by a mutation-analysis run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::identifiers::{MutantId, TestId};

/// Fate of a single mutant in one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutantState {
    Killed,
    Survived,
    NoCoverage,
    TimedOut,
    MemoryError,
    RunError,
    NonViable,
    Started,
    NotStarted,
}

impl MutantState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Killed => "KILLED",
            Self::Survived => "SURVIVED",
            Self::NoCoverage => "NO_COVERAGE",
            Self::TimedOut => "TIMED_OUT",
            Self::MemoryError => "MEMORY_ERROR",
            Self::RunError => "RUN_ERROR",
            Self::NonViable => "NON_VIABLE",
            Self::Started => "STARTED",
            Self::NotStarted => "NOT_STARTED",
        }
    }

    /// Whether a baseline outcome in this state carries a usable signal.
    ///
    /// Timeouts, analysis errors, and unfinished mutants do not: they are
    /// set aside and excluded from scoring for the whole session.
    pub fn is_reliable(&self) -> bool {
        matches!(self, Self::Killed | Self::Survived | Self::NoCoverage)
    }
}

impl fmt::Display for MutantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutantState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "KILLED" => Ok(Self::Killed),
            "SURVIVED" => Ok(Self::Survived),
            "NO_COVERAGE" => Ok(Self::NoCoverage),
            "TIMED_OUT" => Ok(Self::TimedOut),
            "MEMORY_ERROR" => Ok(Self::MemoryError),
            "RUN_ERROR" => Ok(Self::RunError),
            "NON_VIABLE" => Ok(Self::NonViable),
            "STARTED" => Ok(Self::Started),
            "NOT_STARTED" => Ok(Self::NotStarted),
            other => Err(format!("unknown mutant state `{other}`")),
        }
    }
}

/// Immutable record of one mutant's fate, produced fresh by each analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MutantOutcome {
    pub mutant: MutantId,
    pub state: MutantState,
    /// Test reported as responsible for the kill, if any.
    pub killing_test: Option<TestId>,
}

impl MutantOutcome {
    pub fn new(mutant: MutantId, state: MutantState, killing_test: Option<TestId>) -> Self {
        Self {
            mutant,
            state,
            killing_test,
        }
    }

    pub fn killed_by(mutant: MutantId, test: TestId) -> Self {
        Self::new(mutant, MutantState::Killed, Some(test))
    }

    pub fn is_killed(&self) -> bool {
        self.state == MutantState::Killed
    }

    pub fn line(&self) -> u32 {
        self.mutant.line
    }

    pub fn location(&self) -> &str {
        &self.mutant.location
    }
}
