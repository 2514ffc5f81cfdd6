//! Watch list configuration
//!
//! The config file is a JSON object:
//!
//! ```json
//! {
//!   "repositories": [
//!     {"name": "dotfiles", "location": "~/dotfiles"},
//!     {"name": "notes", "location": "../notes"}
//!   ],
//!   "interval": 30
//! }
//! ```
//!
//! `location` and `interval` are the canonical field names. Older configs
//! that use `path` and `poll_interval` are still accepted.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchError};

/// Poll interval used when the config omits one
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// A watched working tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// User-facing label, unique within a config
    pub name: String,
    /// Absolute path to the working tree
    pub location: PathBuf,
}

/// A complete, validated configuration snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub repositories: Vec<Repository>,
    /// Seconds between poll cycles, always > 0
    pub interval: u64,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    #[serde(alias = "path")]
    location: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    repositories: Vec<RawRepository>,
    #[serde(default = "default_interval", alias = "poll_interval")]
    interval: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Config {
    /// Read, parse and validate the config file at `path`.
    ///
    /// Every repository location comes back absolute. Relative locations are
    /// taken relative to the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = absolutize(path, &std::env::current_dir()?);
        let content = fs::read_to_string(&config_path).map_err(|e| WatchError::Config {
            path: config_path.clone(),
            message: format!("cannot read file: {}", e),
        })?;
        Self::parse(&content, &config_path)
    }

    /// Parse config text. `config_path` anchors relative locations and
    /// labels errors.
    pub fn parse(content: &str, config_path: &Path) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(content).map_err(|e| WatchError::Config {
            path: config_path.to_path_buf(),
            message: format!("malformed JSON: {}", e),
        })?;

        if raw.interval == 0 {
            return Err(WatchError::InvalidInterval {
                path: config_path.to_path_buf(),
            });
        }

        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut seen = HashSet::new();
        let mut repositories = Vec::with_capacity(raw.repositories.len());
        for repo in raw.repositories {
            if repo.name.trim().is_empty() {
                return Err(WatchError::Config {
                    path: config_path.to_path_buf(),
                    message: "repository name must not be empty".to_string(),
                });
            }
            if !seen.insert(repo.name.clone()) {
                return Err(WatchError::DuplicateRepository {
                    path: config_path.to_path_buf(),
                    name: repo.name,
                });
            }
            let location = absolutize(&expand_home(&repo.location), &base_dir);
            repositories.push(Repository {
                name: repo.name,
                location,
            });
        }

        Ok(Self {
            repositories,
            interval: raw.interval,
        })
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Look up a repository by its label
    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Repository labels in config order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.repositories.iter().map(|r| r.name.as_str())
    }
}

/// Default config location: `~/.local/share/repowatcher/config.json` on every
/// platform. Only without a home directory does it fall back to the
/// platform data dir, then the current directory.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".local").join("share"))
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("repowatcher")
        .join("config.json")
}

fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Join `path` onto `base` when relative and drop `.`/`..` components
/// lexically. The target does not have to exist.
fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
