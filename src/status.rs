//! Classification of porcelain status output
//!
//! Input is the text printed by `git status --porcelain=v1 --branch`: a
//! `## branch...upstream [ahead N, behind M]` header followed by one line per
//! changed path.
//!
//! # Priority
//!
//! 1. header mentions `ahead` -> `Ahead`
//! 2. header mentions `behind` -> `Behind`
//! 3. no non-blank line after the header -> `Clean`
//! 4. otherwise -> `Dirty`
//!
//! A tree that is both ahead and dirty reports `Ahead`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic state of one working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Clean,
    Dirty,
    Ahead,
    Behind,
    Error,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            State::Clean => "clean",
            State::Dirty => "dirty",
            State::Ahead => "ahead",
            State::Behind => "behind",
            State::Error => "error",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map raw porcelain output to a `State`.
///
/// Failed status commands never reach this function; the poller maps them
/// straight to `State::Error`.
pub fn classify(raw: &str) -> State {
    let mut lines = raw.lines();
    let header = lines.next().unwrap_or("");

    if header.contains("ahead") {
        return State::Ahead;
    }
    if header.contains("behind") {
        return State::Behind;
    }

    if lines.all(|line| line.trim().is_empty()) {
        State::Clean
    } else {
        State::Dirty
    }
}
