//! Reduction of per-repository states to one severity
//!
//! `dirty` anywhere gives red. Otherwise `ahead` anywhere gives yellow.
//! Otherwise green. `behind` and `error` never raise the severity; they are
//! only visible in the per-repository detail.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::poller::RepoState;
use crate::status::State;

/// Overall health signal shown in the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Green,
    Yellow,
    Red,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Green => "green",
            Severity::Yellow => "yellow",
            Severity::Red => "red",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn aggregate(states: &[RepoState]) -> Severity {
    let mut severity = Severity::Green;
    for repo in states {
        match repo.state {
            State::Dirty => return Severity::Red,
            State::Ahead => severity = Severity::Yellow,
            State::Clean | State::Behind | State::Error => {}
        }
    }
    severity
}
