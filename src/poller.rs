//! Per-repository polling and the concurrent fan-out
//!
//! `poll_all` starts one OS thread per repository inside a
//! `std::thread::scope`. Each thread owns exactly one pre-allocated result
//! slot, addressed by the repository's index in the config, so the output
//! order is the config order no matter which check finishes first. The scope
//! exit is the barrier: nothing is returned until every thread has joined.
//!
//! There is no concurrency cap and no per-check timeout. A hung status
//! command delays the whole cycle.

use std::thread;

use serde::{Deserialize, Serialize};

use crate::config::Repository;
use crate::oracle::StatusOracle;
use crate::status::{classify, State};

/// Outcome of one status check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoState {
    pub name: String,
    pub state: State,
}

/// Check a single repository. Never fails: oracle errors become
/// `State::Error`.
pub fn poll(oracle: &dyn StatusOracle, repo: &Repository) -> RepoState {
    let state = match oracle.status(&repo.location) {
        Ok(raw) => classify(&raw),
        Err(e) => {
            tracing::warn!("{}: status check failed: {}", repo.name, e);
            State::Error
        }
    };
    tracing::debug!("{}: {}", repo.name, state);

    RepoState {
        name: repo.name.clone(),
        state,
    }
}

/// Check every repository concurrently and return results in input order.
pub fn poll_all(oracle: &dyn StatusOracle, repos: &[Repository]) -> Vec<RepoState> {
    let mut slots: Vec<Option<RepoState>> = vec![None; repos.len()];

    thread::scope(|scope| {
        for (index, (slot, repo)) in slots.iter_mut().zip(repos).enumerate() {
            // Names are user text and may hold bytes a thread name cannot
            let spawned = thread::Builder::new()
                .name(format!("poll-{}", index))
                .spawn_scoped(scope, move || {
                    *slot = Some(poll(oracle, repo));
                });
            if let Err(e) = spawned {
                tracing::warn!("{}: could not start poll thread: {}", repo.name, e);
            }
        }
    });

    // A slot is empty only if its thread could not be started.
    slots
        .into_iter()
        .zip(repos)
        .map(|(slot, repo)| {
            slot.unwrap_or_else(|| RepoState {
                name: repo.name.clone(),
                state: State::Error,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, WatchError};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// Oracle answering from a fixed table, with optional per-path delay
    struct ScriptedOracle {
        replies: HashMap<PathBuf, (Duration, Option<&'static str>)>,
    }

    impl ScriptedOracle {
        fn new() -> Self {
            Self {
                replies: HashMap::new(),
            }
        }

        fn reply(mut self, path: &str, delay_ms: u64, out: Option<&'static str>) -> Self {
            self.replies
                .insert(PathBuf::from(path), (Duration::from_millis(delay_ms), out));
            self
        }
    }

    impl StatusOracle for ScriptedOracle {
        fn status(&self, dir: &Path) -> Result<String> {
            match self.replies.get(dir) {
                Some((delay, out)) => {
                    std::thread::sleep(*delay);
                    out.map(str::to_string).ok_or_else(|| WatchError::Oracle {
                        message: "scripted failure".into(),
                    })
                }
                None => Err(WatchError::Oracle {
                    message: format!("no reply for {}", dir.display()),
                }),
            }
        }
    }

    fn repo(name: &str, path: &str) -> Repository {
        Repository {
            name: name.to_string(),
            location: PathBuf::from(path),
        }
    }

    #[test]
    fn test_poll_classifies_output() {
        let oracle = ScriptedOracle::new().reply("/a", 0, Some("## main\n M x\n"));
        let state = poll(&oracle, &repo("a", "/a"));
        assert_eq!(state.name, "a");
        assert_eq!(state.state, State::Dirty);
    }

    #[test]
    fn test_poll_maps_failure_to_error() {
        let oracle = ScriptedOracle::new().reply("/a", 0, None);
        assert_eq!(poll(&oracle, &repo("a", "/a")).state, State::Error);
    }

    #[test]
    fn test_poll_all_preserves_order_despite_timing() {
        // First repo finishes last, last repo finishes first
        let oracle = ScriptedOracle::new()
            .reply("/a", 120, Some(""))
            .reply("/b", 60, Some("## main [ahead 1]\n"))
            .reply("/c", 0, Some("## main\n?? new\n"));
        let repos = vec![repo("A", "/a"), repo("B", "/b"), repo("C", "/c")];

        let states = poll_all(&oracle, &repos);
        let names: Vec<_> = states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(states[0].state, State::Clean);
        assert_eq!(states[1].state, State::Ahead);
        assert_eq!(states[2].state, State::Dirty);
    }

    #[test]
    fn test_poll_all_runs_concurrently() {
        let oracle = ScriptedOracle::new()
            .reply("/a", 300, Some(""))
            .reply("/b", 300, Some(""))
            .reply("/c", 300, Some(""));
        let repos = vec![repo("a", "/a"), repo("b", "/b"), repo("c", "/c")];

        let start = std::time::Instant::now();
        let states = poll_all(&oracle, &repos);
        assert_eq!(states.len(), 3);
        assert!(start.elapsed() < Duration::from_millis(800));
    }

    #[test]
    fn test_poll_all_isolates_failures() {
        let oracle = ScriptedOracle::new()
            .reply("/ok", 0, Some(""))
            .reply("/bad", 0, None);
        let repos = vec![repo("bad", "/bad"), repo("ok", "/ok")];
        let states = poll_all(&oracle, &repos);
        assert_eq!(states[0].state, State::Error);
        assert_eq!(states[1].state, State::Clean);
    }

    #[test]
    fn test_poll_all_accepts_any_repository_name() {
        let oracle = ScriptedOracle::new()
            .reply("/nul", 0, Some(""))
            .reply("/ok", 0, Some("## main\n M x\n"));
        let repos = vec![repo("a\u{0}b", "/nul"), repo("ok", "/ok")];
        let states = poll_all(&oracle, &repos);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].name, "a\u{0}b");
        assert_eq!(states[0].state, State::Clean);
        assert_eq!(states[1].state, State::Dirty);
    }

    #[test]
    fn test_poll_all_empty() {
        let oracle = ScriptedOracle::new();
        assert!(poll_all(&oracle, &[]).is_empty());
    }
}
