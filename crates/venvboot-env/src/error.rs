use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The external steps of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateVenv,
    Install,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateVenv => "create_venv",
            Step::Install => "install",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateVenv => f.write_str("venv creation"),
            Step::Install => f.write_str("dependency installation"),
        }
    }
}

/// Errors from environment creation, activation and installation.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("No Python interpreter found (tried: {tried})")]
    InterpreterNotFound { tried: String },

    #[error("Failed to launch {program} for {step}: {source}")]
    Spawn {
        step: Step,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{step} failed with exit code {code}")]
    ToolFailed { step: Step, code: i32 },

    #[error("{step} was terminated by a signal")]
    Terminated { step: Step },

    #[error("Virtual environment at {} has no interpreter", .0.display())]
    NotCreated(PathBuf),

    #[error("Cannot build PATH with {}: {source}", .dir.display())]
    ActivationPath {
        dir: PathBuf,
        #[source]
        source: std::env::JoinPathsError,
    },

    #[error("Cannot read manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EnvError {
    /// Process exit code for this error: the failing tool's own code where there is one.
    pub fn exit_code(&self) -> i32 {
        match self {
            EnvError::ToolFailed { code, .. } => *code,
            EnvError::InterpreterNotFound { .. } => 127,
            _ => 1,
        }
    }
}
