//! Create the venv and install the dependency manifest into it.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::activation::ActiveEnvironment;
use crate::error::{EnvError, Step};
use crate::layout::EnvLayout;
use crate::process::{run_step, Invocation, ProcessRunner};

/// `<python> -m venv [--clear] <venv>` in the root.
///
/// Runs even when the venv already exists; the venv module reuses the directory,
/// which keeps re-runs harmless.
pub fn create_venv(
    runner: &dyn ProcessRunner,
    python: &Path,
    layout: &EnvLayout,
    clear: bool,
) -> Result<(), EnvError> {
    if layout.is_created() && !clear {
        tracing::info!(venv = %layout.venv_dir().display(), "Reusing existing virtual environment");
    }
    let mut inv = Invocation::new(Step::CreateVenv, python, layout.root())
        .arg("-m")
        .arg("venv");
    if clear {
        inv = inv.arg("--clear");
    }
    let inv = inv.arg(layout.venv_name());
    run_step(runner, &inv)?;

    if !layout.is_created() {
        return Err(EnvError::NotCreated(layout.venv_dir()));
    }
    Ok(())
}

/// `<venv python> -m pip install -r <manifest>` inside the active environment.
///
/// Takes the activation guard so installing into an inactive venv can't be written.
/// On success the manifest digest is stamped into the venv.
pub fn install_requirements(
    runner: &dyn ProcessRunner,
    active: &ActiveEnvironment,
    layout: &EnvLayout,
) -> Result<(), EnvError> {
    let mut inv = Invocation::new(Step::Install, active.python(), layout.root())
        .arg("-m")
        .arg("pip")
        .arg("install")
        .arg("-r")
        .arg(layout.manifest_name());
    active.apply(&mut inv);
    run_step(runner, &inv)?;

    match manifest_fingerprint(&layout.manifest()) {
        Ok(digest) => {
            if let Err(e) = write_stamp(layout, &digest) {
                tracing::warn!(error = %e, "Cannot write requirements stamp");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Cannot fingerprint manifest"),
    }
    Ok(())
}

/// Requirement lines: trimmed, without blanks and `#` comments.
pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// SHA-256 hex digest of the manifest content.
pub fn manifest_fingerprint(path: &Path) -> Result<String, EnvError> {
    let content = fs::read(path).map_err(|source| EnvError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

/// Record `digest` as the manifest fingerprint of the last successful install.
pub fn write_stamp(layout: &EnvLayout, digest: &str) -> io::Result<()> {
    fs::write(layout.stamp_path(), digest)
}

pub fn read_stamp(layout: &EnvLayout) -> Option<String> {
    fs::read_to_string(layout.stamp_path())
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// How the manifest relates to the last successful install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestState {
    UpToDate,
    Changed,
    NeverInstalled,
    NoManifest,
}

pub fn manifest_state(layout: &EnvLayout) -> Result<ManifestState, EnvError> {
    if !layout.manifest_present() {
        return Ok(ManifestState::NoManifest);
    }
    let Some(stamp) = read_stamp(layout) else {
        return Ok(ManifestState::NeverInstalled);
    };
    if manifest_fingerprint(&layout.manifest())? == stamp {
        Ok(ManifestState::UpToDate)
    } else {
        Ok(ManifestState::Changed)
    }
}
