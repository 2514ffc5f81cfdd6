//! External status command
//!
//! The poller only sees the `StatusOracle` trait. `GitOracle` is the real
//! implementation and shells out to git; tests substitute scripted oracles.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, WatchError};

/// Arguments passed to git for every status check
pub const GIT_STATUS_ARGS: [&str; 3] = ["status", "--porcelain=v1", "--branch"];

/// Source of raw porcelain status text for a working tree
pub trait StatusOracle: Send + Sync {
    /// Run the status check with `dir` as working directory.
    ///
    /// Returns the command's stdout. Any failure to run, or a non-zero exit,
    /// is an `Oracle` error.
    fn status(&self, dir: &Path) -> Result<String>;
}

/// Runs `git status --porcelain=v1 --branch`
#[derive(Debug, Clone)]
pub struct GitOracle {
    program: String,
}

impl GitOracle {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Use a different git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusOracle for GitOracle {
    fn status(&self, dir: &Path) -> Result<String> {
        if !dir.is_dir() {
            return Err(WatchError::Oracle {
                message: format!("{} is not an accessible directory", dir.display()),
            });
        }

        let output = Command::new(&self.program)
            .args(GIT_STATUS_ARGS)
            .current_dir(dir)
            .output()
            .map_err(|e| WatchError::Oracle {
                message: format!("Failed to execute {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WatchError::Oracle {
                message: format!(
                    "{} {} failed in {}: {}",
                    self.program,
                    GIT_STATUS_ARGS.join(" "),
                    dir.display(),
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
