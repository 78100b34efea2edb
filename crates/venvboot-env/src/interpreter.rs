//! Base interpreter discovery for `python -m venv`.

use std::path::{Path, PathBuf};

use crate::error::EnvError;

/// Searched on PATH, in order, when no override is configured.
pub const CANDIDATES: &[&str] = &["python3", "python"];

/// Resolve the interpreter used to create the venv.
///
/// An override is taken as a path when it names an existing file, otherwise it is
/// looked up on PATH. Without an override the first of [`CANDIDATES`] on PATH wins.
pub fn find_python(override_python: Option<&str>) -> Result<PathBuf, EnvError> {
    if let Some(name) = override_python {
        let as_path = Path::new(name);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }
        return which::which(name).map_err(|_| EnvError::InterpreterNotFound {
            tried: name.to_string(),
        });
    }

    for name in CANDIDATES {
        if let Ok(path) = which::which(name) {
            tracing::debug!(python = %path.display(), "Found interpreter");
            return Ok(path);
        }
    }
    Err(EnvError::InterpreterNotFound {
        tried: CANDIDATES.join(", "),
    })
}
