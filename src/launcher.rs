//! On-click hooks for the bar widget
//!
//! The widget lists repository names and, when one is clicked, asks for an
//! interactive client (lazygit by default) to be started in that working
//! tree. Both read the same config the daemon polls.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use crate::config::{Config, Repository};
use crate::error::{Result, WatchError};

pub const DEFAULT_TOOL: &str = "lazygit";

/// A resolved launch: which program, and where to run it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl LaunchPlan {
    /// Find `name` in `config` and locate `tool` on PATH.
    ///
    /// `tool` may carry arguments, split on whitespace
    /// (`"alacritty -e lazygit"`).
    pub fn resolve(config: &Config, name: &str, tool: &str) -> Result<Self> {
        let repo = find_repository(config, name)?;

        let mut parts = tool.split_whitespace();
        let program_name = parts.next().ok_or_else(|| WatchError::ToolNotFound {
            tool: tool.to_string(),
        })?;
        let program = which::which(program_name).map_err(|_| WatchError::ToolNotFound {
            tool: program_name.to_string(),
        })?;

        Ok(Self {
            program,
            args: parts.map(str::to_string).collect(),
            working_dir: repo.location.clone(),
        })
    }

    /// Start the tool and wait for it to exit
    pub fn run(&self) -> Result<ExitStatus> {
        tracing::info!(
            "Launching {} in {}",
            self.program.display(),
            self.working_dir.display()
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .status()?;
        Ok(status)
    }
}

pub fn find_repository<'a>(config: &'a Config, name: &str) -> Result<&'a Repository> {
    config
        .repository(name)
        .ok_or_else(|| WatchError::UnknownRepository {
            name: name.to_string(),
        })
}
