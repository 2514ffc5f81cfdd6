//! The poll loop
//!
//! ```text
//! ConfigStore::snapshot ──► poll_all (N threads, joined) ──► aggregate ──► emit ──► sleep
//!        ▲                                                                          │
//!        └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each cycle works from the snapshot it took at the start, so a reload that
//! lands mid-cycle takes effect on the next one. The blocking fan-out runs on
//! tokio's blocking pool; the loop itself only awaits the join, the sleep and
//! the shutdown future. If shutdown wins the race against a cycle in flight,
//! that cycle emits nothing.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use crate::aggregate::{aggregate, Severity};
use crate::config::Config;
use crate::emit::Emitter;
use crate::error::{Result, WatchError};
use crate::oracle::StatusOracle;
use crate::poller::{poll_all, RepoState};
use crate::store::ConfigStore;

/// Poll every repository in `config` and reduce the results.
pub fn check(oracle: &dyn StatusOracle, config: &Config) -> (Severity, Vec<RepoState>) {
    let states = poll_all(oracle, &config.repositories);
    let severity = aggregate(&states);
    (severity, states)
}

pub struct Daemon<W: Write> {
    store: Arc<ConfigStore>,
    oracle: Arc<dyn StatusOracle>,
    emitter: Emitter<W>,
}

impl<W: Write> Daemon<W> {
    pub fn new(store: Arc<ConfigStore>, oracle: Arc<dyn StatusOracle>, emitter: Emitter<W>) -> Self {
        Self {
            store,
            oracle,
            emitter,
        }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn into_emitter(self) -> Emitter<W> {
        self.emitter
    }

    /// Run exactly one cycle on the calling thread
    pub fn run_once(&mut self) -> Severity {
        let snapshot = self.store.snapshot();
        let (severity, states) = check(self.oracle.as_ref(), &snapshot);
        self.publish(severity, &states);
        severity
    }

    /// Poll until `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!("Polling started");

        loop {
            let snapshot = self.store.snapshot();
            tracing::debug!(
                "Cycle start: {} repositories",
                snapshot.repositories.len()
            );

            let oracle = Arc::clone(&self.oracle);
            let config = Arc::clone(&snapshot);
            let cycle = tokio::task::spawn_blocking(move || check(oracle.as_ref(), &config));

            let joined = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested during a cycle; nothing emitted");
                    return Ok(());
                }
                joined = cycle => joined,
            };

            match joined {
                Ok((severity, states)) => self.publish(severity, &states),
                Err(e) => tracing::error!("Poll cycle aborted: {}", e),
            }

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    return Ok(());
                }
                _ = tokio::time::sleep(snapshot.poll_interval()) => {}
            }
        }
    }

    fn publish(&mut self, severity: Severity, states: &[RepoState]) {
        match self.emitter.emit(severity, states) {
            Ok(()) => {}
            Err(e @ WatchError::Serialization(_)) => {
                tracing::error!("Skipping emission for this cycle: {}", e)
            }
            Err(e) => tracing::warn!("Failed to write status line: {}", e),
        }
    }
}
