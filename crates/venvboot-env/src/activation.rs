//! Scoped activation of a virtual environment.
//!
//! Activation never touches this process's own environment. While an
//! [`ActiveEnvironment`] is alive, every child command passed through
//! [`ActiveEnvironment::apply`] resolves to the venv: `VIRTUAL_ENV` is set, the venv
//! bin directory is first on `PATH` and `PYTHONHOME` is removed. Dropping the guard
//! deactivates, on success and on early return alike.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use venvboot_core::config::env_keys::activation as keys;

use crate::error::EnvError;
use crate::layout::EnvLayout;
use crate::process::Invocation;

#[derive(Debug)]
pub struct ActiveEnvironment {
    venv_dir: PathBuf,
    python: PathBuf,
    path: OsString,
}

/// Activate the venv described by `layout`. It must already be created.
pub fn activate(layout: &EnvLayout) -> Result<ActiveEnvironment, EnvError> {
    if !layout.is_created() {
        return Err(EnvError::NotCreated(layout.venv_dir()));
    }
    let bin_dir = layout.bin_dir();
    let path = prepend_path(&bin_dir, env::var_os(keys::PATH))?;

    tracing::info!(venv = %layout.venv_dir().display(), "Activated virtual environment");
    Ok(ActiveEnvironment {
        venv_dir: layout.venv_dir(),
        python: layout.interpreter(),
        path,
    })
}

fn prepend_path(bin_dir: &Path, prior: Option<OsString>) -> Result<OsString, EnvError> {
    let mut entries = vec![bin_dir.to_path_buf()];
    if let Some(prior) = prior {
        entries.extend(env::split_paths(&prior).filter(|p| p != bin_dir));
    }
    env::join_paths(entries).map_err(|source| EnvError::ActivationPath {
        dir: bin_dir.to_path_buf(),
        source,
    })
}

impl ActiveEnvironment {
    /// The venv's interpreter; installers run through it.
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Make `invocation` run inside this environment.
    pub fn apply(&self, invocation: &mut Invocation) {
        invocation.env(keys::VIRTUAL_ENV, &self.venv_dir);
        invocation.env(keys::PATH, &self.path);
        invocation.env_remove(keys::PYTHONHOME);
    }

    /// Explicit release; equivalent to dropping the guard.
    pub fn deactivate(self) {}
}

impl Drop for ActiveEnvironment {
    fn drop(&mut self) {
        tracing::info!(venv = %self.venv_dir.display(), "Deactivated virtual environment");
    }
}
