//! Paths of a bootstrapped directory: root, venv and manifest.

use std::path::{Path, PathBuf};

use venvboot_core::config::BootstrapConfig;

/// Written inside the venv after a successful install.
pub const STAMP_FILE: &str = ".venvboot-requirements.sha256";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    root: PathBuf,
    venv_name: String,
    manifest_name: String,
}

impl EnvLayout {
    pub fn new(root: &Path, venv_name: &str, manifest_name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            venv_name: venv_name.to_string(),
            manifest_name: manifest_name.to_string(),
        }
    }

    pub fn from_config(cfg: &BootstrapConfig) -> Self {
        Self::new(&cfg.root, &cfg.venv_dir, &cfg.requirements)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name passed to `python -m venv`, relative to the root.
    pub fn venv_name(&self) -> &str {
        &self.venv_name
    }

    /// Name passed to `pip install -r`, relative to the root.
    pub fn manifest_name(&self) -> &str {
        &self.manifest_name
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.root.join(&self.venv_name)
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(&self.manifest_name)
    }

    pub fn stamp_path(&self) -> PathBuf {
        self.venv_dir().join(STAMP_FILE)
    }

    /// `bin/` on Unix, `Scripts/` on Windows. An existing directory wins over the
    /// platform default so a venv made by another Python layout still resolves.
    pub fn bin_dir(&self) -> PathBuf {
        let venv = self.venv_dir();
        if venv.join("bin").is_dir() {
            venv.join("bin")
        } else if venv.join("Scripts").is_dir() {
            venv.join("Scripts")
        } else if cfg!(windows) {
            venv.join("Scripts")
        } else {
            venv.join("bin")
        }
    }

    /// The venv's own interpreter.
    pub fn interpreter(&self) -> PathBuf {
        let bin = self.bin_dir();
        if bin.ends_with("Scripts") {
            bin.join("python.exe")
        } else {
            bin.join("python")
        }
    }

    pub fn is_created(&self) -> bool {
        self.interpreter().exists()
    }

    pub fn manifest_present(&self) -> bool {
        self.manifest().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_paths_resolve_against_root() {
        let layout = EnvLayout::new(Path::new("/srv/app"), "venv", "requirements.txt");
        assert_eq!(layout.venv_dir(), PathBuf::from("/srv/app/venv"));
        assert_eq!(layout.manifest(), PathBuf::from("/srv/app/requirements.txt"));
        assert_eq!(
            layout.stamp_path(),
            PathBuf::from("/srv/app/venv/.venvboot-requirements.sha256")
        );
    }

    #[test]
    fn test_not_created_until_interpreter_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = EnvLayout::new(tmp.path(), "venv", "requirements.txt");
        assert!(!layout.is_created());

        fs::create_dir_all(tmp.path().join("venv").join("bin")).unwrap();
        assert!(!layout.is_created());
        fs::write(tmp.path().join("venv").join("bin").join("python"), "").unwrap();
        assert!(layout.is_created());
        assert_eq!(layout.interpreter(), tmp.path().join("venv/bin/python"));
    }

    #[test]
    fn test_windows_layout_detected() {
        let tmp = tempfile::tempdir().unwrap();
        let scripts = tmp.path().join(".venv").join("Scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("python.exe"), "").unwrap();

        let layout = EnvLayout::new(tmp.path(), ".venv", "requirements.txt");
        assert_eq!(layout.interpreter(), scripts.join("python.exe"));
        assert!(layout.is_created());
    }

    #[test]
    fn test_manifest_must_be_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = EnvLayout::new(tmp.path(), "venv", "requirements.txt");
        fs::create_dir(tmp.path().join("requirements.txt")).unwrap();
        assert!(!layout.manifest_present());
    }
}
