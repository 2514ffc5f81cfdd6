//! repowatcher: git working tree status for desktop bars
//!
//! Polls a configured set of local repositories, classifies each one from
//! `git status --porcelain=v1 --branch`, and prints one JSON line per cycle
//! with an overall severity and the per-repository detail.
//!
//! # Example
//!
//! ```ignore
//! use repowatcher::{aggregate, poll_all, ConfigStore, GitOracle};
//!
//! let store = ConfigStore::open("/home/me/.local/share/repowatcher/config.json")?;
//! let snapshot = store.snapshot();
//! let states = poll_all(&GitOracle::new(), &snapshot.repositories);
//! println!("{} {:?}", aggregate(&states), states);
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod emit;
pub mod error;
pub mod launcher;
pub mod oracle;
pub mod poller;
pub mod reload;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use aggregate::{aggregate, Severity};
pub use cli::{Cli, Commands};
pub use config::{default_config_path, Config, Repository};
pub use daemon::{check, Daemon};
pub use emit::{format_line, Emitter, TooltipStyle};
pub use error::{Result, WatchError};
pub use launcher::LaunchPlan;
pub use oracle::{GitOracle, StatusOracle};
pub use poller::{poll, poll_all, RepoState};
pub use reload::{apply_reload, spawn_signal_reloader, ConfigWatcher};
pub use status::{classify, State};
pub use store::{ConfigStore, ReloadOutcome};
