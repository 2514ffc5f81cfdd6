//! CLI argument definitions using clap
//!
//! `repowatcher` with no subcommand behaves like `repowatcher run`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::default_config_path;
use crate::emit::TooltipStyle;
use crate::launcher::DEFAULT_TOOL;

/// Git working tree status for desktop bars
#[derive(Parser, Debug)]
#[command(name = "repowatcher")]
#[command(about = "Polls local git repositories and prints status-bar JSON")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "REPOWATCHER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level (logs go to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Poll repositories and print one JSON line per cycle
    Run(RunArgs),

    /// Print configured repository names, one per line
    List,

    /// Launch an interactive tool inside a repository
    Open(OpenArgs),

    /// Validate the configuration file
    Check,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Tooltip rendering
    #[arg(long, value_enum, default_value_t = TooltipStyle::List)]
    pub tooltip: TooltipStyle,

    /// Also reload when the config file changes on disk
    #[arg(long)]
    pub watch_config: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// Repository name as it appears in the config
    pub name: String,

    /// Program to launch, optionally with arguments
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,
}

impl Cli {
    /// Config path from `--config`, `REPOWATCHER_CONFIG`, or the default
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// The subcommand to run, defaulting to `run`
    pub fn subcommand(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}
