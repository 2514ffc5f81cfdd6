//! Live config reload
//!
//! Two triggers feed the same path:
//!
//! - SIGHUP (unix only), handled by a tokio task
//! - optionally, changes to the config file itself, seen by a debounced
//!   `notify` watcher on the file's directory
//!
//! Both call [`apply_reload`], which re-reads the original config path and
//! swaps it into the store. A failed reload is logged to stderr and the
//! running config stays active.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use tokio::task::JoinHandle;

use crate::error::{Result, WatchError};
use crate::store::{ConfigStore, ReloadOutcome};

/// Reload the store from disk and log the outcome.
///
/// Returns true when a new config was swapped in.
pub fn apply_reload(store: &ConfigStore, trigger: &str) -> bool {
    match store.reload() {
        Ok(ReloadOutcome::Replaced) => {
            let snapshot = store.snapshot();
            tracing::info!(
                "Config reloaded ({}): {} repositories, interval {}s",
                trigger,
                snapshot.repositories.len(),
                snapshot.interval
            );
            true
        }
        Ok(ReloadOutcome::Unchanged) => {
            tracing::info!("Config reload ({}): no changes", trigger);
            false
        }
        Err(e) => {
            tracing::warn!(
                "Config reload ({}) rejected, keeping current config: {}",
                trigger,
                e
            );
            false
        }
    }
}

/// Spawn the SIGHUP listener on the current tokio runtime.
///
/// The handler is installed before this returns, so a hang-up sent any time
/// afterwards is queued for the listener instead of killing the process.
#[cfg(unix)]
pub fn spawn_signal_reloader(store: Arc<ConfigStore>) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("Cannot listen for SIGHUP, reload requires restart: {}", e);
            return tokio::spawn(async {});
        }
    };
    tracing::debug!("Listening for SIGHUP on {}", store.path().display());

    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            let store = Arc::clone(&store);
            let outcome =
                tokio::task::spawn_blocking(move || apply_reload(&store, "SIGHUP")).await;
            if let Err(e) = outcome {
                tracing::error!("Reload task failed: {}", e);
            }
        }
    })
}

#[cfg(not(unix))]
pub fn spawn_signal_reloader(_store: Arc<ConfigStore>) -> JoinHandle<()> {
    tracing::info!("Reload signals are not supported on this platform; restart to reload");
    tokio::spawn(async {})
}

/// Debounce window for config file events
const WATCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Reloads the store whenever the config file changes on disk.
///
/// Watching stops when this value is dropped.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ConfigWatcher {
    pub fn start(store: Arc<ConfigStore>) -> Result<Self> {
        let config_path = store.path().to_path_buf();
        let dir = config_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = config_path.file_name().map(|n| n.to_os_string());

        let (tx, rx) = std::sync::mpsc::channel();
        let mut debouncer = new_debouncer(WATCH_DEBOUNCE, tx).map_err(|e| WatchError::Watch {
            message: e.to_string(),
        })?;

        // Editors often replace the file instead of writing in place, so the
        // directory is watched rather than the file.
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Watch {
                message: format!("cannot watch {}: {}", dir.display(), e),
            })?;

        std::thread::Builder::new()
            .name("config-watch".to_string())
            .spawn(move || {
                // Ends when the debouncer (and its sender) is dropped
                for result in rx {
                    match result {
                        Ok(events) => {
                            let touched = events.iter().any(|event| {
                                matches!(event.kind, DebouncedEventKind::Any)
                                    && event.path.file_name().map(|n| n.to_os_string())
                                        == file_name
                            });
                            if touched {
                                apply_reload(&store, "file change");
                            }
                        }
                        Err(e) => tracing::warn!("Config watcher error: {:?}", e),
                    }
                }
                tracing::debug!("Config watcher stopped");
            })?;

        tracing::info!("Watching {} for changes", config_path.display());
        Ok(Self {
            _debouncer: debouncer,
        })
    }
}
