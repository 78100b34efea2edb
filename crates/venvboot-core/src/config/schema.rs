//! Typed configuration structs, loaded from environment variables.

use super::env_keys::{interaction, layout, observability as obv_keys, python};
use super::loader::{env_bool, env_optional, env_or};
use std::path::PathBuf;

pub const DEFAULT_VENV_DIR: &str = "venv";
pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";

/// What the bootstrapper does and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Working root; every relative path below is resolved against it.
    pub root: PathBuf,
    /// Base interpreter override. `None` means discover `python3` / `python`.
    pub python: Option<String>,
    /// Virtual environment directory, relative to `root`.
    pub venv_dir: String,
    /// Dependency manifest, relative to `root`.
    pub requirements: String,
    /// Pass `--clear` to `python -m venv`.
    pub clear: bool,
    /// Block for user input before exiting.
    pub pause: bool,
}

/// Values given on the command line. `None` / `false` leave the env value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub python: Option<String>,
    pub venv_dir: Option<String>,
    pub requirements: Option<String>,
    pub clear: bool,
    pub no_pause: bool,
}

impl BootstrapConfig {
    /// Defaults reproduce the zero-argument behaviour: `venv`, `requirements.txt`, pause.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            python: None,
            venv_dir: DEFAULT_VENV_DIR.to_string(),
            requirements: DEFAULT_REQUIREMENTS.to_string(),
            clear: false,
            pause: true,
        }
    }

    /// Read `VENVBOOT_*` variables. The root itself is resolved by the caller since
    /// `.env` is loaded from it.
    pub fn from_env(root: PathBuf) -> Self {
        Self {
            root,
            python: env_optional(python::VENVBOOT_PYTHON, &[]),
            venv_dir: env_or(layout::VENVBOOT_VENV_DIR, &[], || DEFAULT_VENV_DIR.to_string()),
            requirements: env_or(layout::VENVBOOT_REQUIREMENTS, &[], || {
                DEFAULT_REQUIREMENTS.to_string()
            }),
            clear: env_bool(python::VENVBOOT_CLEAR, &[], false),
            pause: !env_bool(interaction::VENVBOOT_NO_PAUSE, &[], false),
        }
    }

    /// CLI > env > default.
    pub fn with_cli_overrides(mut self, cli: CliOverrides) -> Self {
        if let Some(p) = cli.python {
            self.python = Some(p);
        }
        if let Some(v) = cli.venv_dir {
            self.venv_dir = v;
        }
        if let Some(r) = cli.requirements {
            self.requirements = r;
        }
        if cli.clear {
            self.clear = true;
        }
        if cli.no_pause {
            self.pause = false;
        }
        self
    }

    /// Root override from the environment, if any.
    pub fn root_from_env() -> Option<PathBuf> {
        env_optional(layout::VENVBOOT_ROOT, &[]).map(PathBuf::from)
    }
}

/// Observability settings: quiet, log_level, log_json, audit_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    /// Cached after the first call; `.env` must already be loaded.
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| Self {
            quiet: env_bool(obv_keys::VENVBOOT_QUIET, &[], false),
            log_level: env_or(obv_keys::VENVBOOT_LOG_LEVEL, &[], || {
                "venvboot=info".to_string()
            }),
            log_json: env_bool(obv_keys::VENVBOOT_LOG_JSON, &[], false),
            audit_log: env_optional(obv_keys::VENVBOOT_AUDIT_LOG, &[]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matches_zero_argument_defaults() {
        let cfg = BootstrapConfig::new(PathBuf::from("/srv/app"));
        assert_eq!(cfg.venv_dir, "venv");
        assert_eq!(cfg.requirements, "requirements.txt");
        assert!(cfg.pause);
        assert!(!cfg.clear);
        assert!(cfg.python.is_none());
    }

    #[test]
    fn test_cli_overrides_take_priority() {
        let cfg = BootstrapConfig::new(PathBuf::from("/srv/app")).with_cli_overrides(
            CliOverrides {
                python: Some("python3.11".into()),
                venv_dir: Some(".venv".into()),
                requirements: None,
                clear: true,
                no_pause: true,
            },
        );
        assert_eq!(cfg.python.as_deref(), Some("python3.11"));
        assert_eq!(cfg.venv_dir, ".venv");
        assert_eq!(cfg.requirements, "requirements.txt");
        assert!(cfg.clear);
        assert!(!cfg.pause);
    }

    #[test]
    fn test_empty_overrides_keep_values() {
        let base = BootstrapConfig::new(PathBuf::from("/srv/app"));
        let cfg = base.clone().with_cli_overrides(CliOverrides::default());
        assert_eq!(cfg, base);
    }
}
