//! Thread-safe holder for the active configuration
//!
//! The active `Config` lives behind a `parking_lot::RwLock` as an
//! `Arc<Config>`. Readers clone the `Arc` and drop the lock immediately, so a
//! poll cycle keeps a consistent snapshot for its whole run while a reload
//! swaps in a new `Arc` under the write lock.
//!
//! File I/O and parsing always happen outside the lock: `reload()` builds the
//! new config first and only then takes the write lock to swap pointers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;

/// Result of a successful reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The file parsed to a different config, which is now active
    Replaced,
    /// The file parsed to the config that was already active
    Unchanged,
}

/// Owner of the active configuration
pub struct ConfigStore {
    /// Path the config was first loaded from; reloads read the same file
    path: PathBuf,
    active: RwLock<Arc<Config>>,
}

impl ConfigStore {
    /// Load the initial config. Any error here is fatal to the caller.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = Config::load(&path)?;
        Ok(Self::with_config(path, config))
    }

    /// Build a store around an already-loaded config
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            active: RwLock::new(Arc::new(config)),
        }
    }

    /// Path reloads read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current configuration. Never blocks a writer for longer than an
    /// `Arc` clone.
    pub fn snapshot(&self) -> Arc<Config> {
        Arc::clone(&self.active.read())
    }

    /// Atomically swap in `config`
    pub fn replace(&self, config: Config) {
        *self.active.write() = Arc::new(config);
    }

    /// Re-read the original config file and swap it in.
    ///
    /// On error the active config is left as it was.
    pub fn reload(&self) -> Result<ReloadOutcome> {
        let config = Config::load(&self.path)?;
        let mut guard = self.active.write();
        if **guard == config {
            return Ok(ReloadOutcome::Unchanged);
        }
        *guard = Arc::new(config);
        Ok(ReloadOutcome::Replaced)
    }
}
