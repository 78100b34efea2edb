use clap::{Parser, Subcommand};
use std::path::PathBuf;

use venvboot_core::config::CliOverrides;

/// venvboot - create a Python venv next to the executable and install requirements.txt
///
/// With no subcommand: create the venv, activate it, install requirements.txt if
/// present, deactivate, and wait for a key press.
#[derive(Parser, Debug)]
#[command(name = "venvboot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Working root (default: $VENVBOOT_ROOT, else the executable's directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Virtual environment directory, relative to the root (default: venv)
    #[arg(long, value_name = "NAME", global = true)]
    pub venv_dir: Option<String>,

    /// Dependency manifest, relative to the root (default: requirements.txt)
    #[arg(long, value_name = "FILE", global = true)]
    pub requirements: Option<String>,

    /// Interpreter used to create the venv (default: python3, then python)
    #[arg(long, value_name = "PATH")]
    pub python: Option<String>,

    /// Recreate the venv from scratch (python -m venv --clear)
    #[arg(long, default_value = "false")]
    pub clear: bool,

    /// Exit without waiting for a key press
    #[arg(long, default_value = "false")]
    pub no_pause: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the venv and manifest state without running anything
    Status {
        /// Output as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Remove the virtual environment directory
    Clean {
        /// Show what would be removed without deleting
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f', default_value = "false")]
        force: bool,
    },
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            python: self.python.clone(),
            venv_dir: self.venv_dir.clone(),
            requirements: self.requirements.clone(),
            clear: self.clear,
            no_pause: self.no_pause,
        }
    }
}
