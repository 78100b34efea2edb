//! The bootstrap sequence: create venv → activate → install manifest if present →
//! deactivate → pause.
//!
//! Work steps halt at the first failure; the installer never runs after a failed
//! creation. Deactivation is the activation guard's drop, so it happens on every
//! path, and the pause still runs after a failure so the error stays on screen.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use thiserror::Error;

use venvboot_core::config::BootstrapConfig;
use venvboot_core::observability;
use venvboot_env::builder::{create_venv, install_requirements};
use venvboot_env::interpreter::find_python;
use venvboot_env::{activate, EnvError, EnvLayout, ProcessRunner};

pub const PAUSE_PROMPT: &str = "Press any key to continue . . . ";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Cannot use {} as working root: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Console I/O failed: {0}")]
    Console(#[from] io::Error),
}

impl BootstrapError {
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::Env(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Root priority: CLI > VENVBOOT_ROOT > directory of the running executable.
/// The result is absolute, so the caller's cwd never matters afterwards.
pub fn resolve_root(cli_root: Option<&Path>) -> Result<PathBuf, BootstrapError> {
    let candidate = match cli_root
        .map(Path::to_path_buf)
        .or_else(BootstrapConfig::root_from_env)
    {
        Some(p) => p,
        None => {
            let exe = std::env::current_exe().map_err(|source| BootstrapError::Root {
                path: PathBuf::from("<current executable>"),
                source,
            })?;
            exe.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
        }
    };
    let root = candidate
        .canonicalize()
        .map_err(|source| BootstrapError::Root {
            path: candidate.clone(),
            source,
        })?;
    Ok(strip_verbatim(root))
}

/// Windows `canonicalize` returns `\\?\C:\...`; drive paths lose the prefix so the
/// root displays and joins like a normal path. Verbatim UNC paths are kept.
fn strip_verbatim(path: PathBuf) -> PathBuf {
    let plain = path
        .to_str()
        .and_then(|s| s.strip_prefix(r"\\?\"))
        .filter(|rest| rest.as_bytes().get(1) == Some(&b':'))
        .map(PathBuf::from);
    plain.unwrap_or(path)
}

/// Step (a): make the root the process working directory.
pub fn enter_root(root: &Path) -> Result<(), BootstrapError> {
    std::env::set_current_dir(root).map_err(|source| BootstrapError::Root {
        path: root.to_path_buf(),
        source,
    })
}

/// What a run did.
#[derive(Debug)]
pub struct RunReport {
    /// The manifest was present and the installer succeeded.
    pub installed: bool,
    pub failure: Option<BootstrapError>,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.failure.as_ref().map_or(0, BootstrapError::exit_code)
    }
}

pub struct Bootstrapper<'a> {
    config: &'a BootstrapConfig,
    runner: &'a dyn ProcessRunner,
    interactive: bool,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(config: &'a BootstrapConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            config,
            runner,
            interactive: false,
        }
    }

    /// Pause on a single key press from the terminal instead of a line from `input`.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Run steps (b)–(f). Notices go to `out`, the failure summary to `err`. When not
    /// interactive the pause reads one line from `input`.
    pub fn run(
        &self,
        out: &mut dyn Write,
        err: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> RunReport {
        let layout = EnvLayout::from_config(self.config);

        let (installed, failure) = match self.work(&layout, out) {
            Ok(installed) => (installed, None),
            Err(e) => {
                tracing::error!(error = %e, "Bootstrap failed");
                let _ = writeln!(err, "Error: {e}");
                (false, Some(e))
            }
        };

        if self.config.pause {
            if let Err(e) = pause(out, input, self.interactive) {
                tracing::warn!(error = %e, "Pause interrupted");
            }
        }

        let report = RunReport { installed, failure };
        observability::audit_run_finished(report.exit_code(), report.installed);
        report
    }

    fn work(&self, layout: &EnvLayout, out: &mut dyn Write) -> Result<bool, BootstrapError> {
        let python = find_python(self.config.python.as_deref())?;
        tracing::info!(python = %python.display(), "Using interpreter");

        create_venv(self.runner, &python, layout, self.config.clear)?;
        let active = activate(layout)?;

        let installed = if layout.manifest_present() {
            writeln!(
                out,
                "{} found. Installing dependencies...",
                layout.manifest_name()
            )?;
            out.flush()?;
            install_requirements(self.runner, &active, layout)?;
            true
        } else {
            writeln!(
                out,
                "{} not found. Skipping dependency installation.",
                layout.manifest_name()
            )?;
            false
        };

        active.deactivate();
        Ok(installed)
    }
}

/// Step (f). On a terminal any single key continues; otherwise one line (or end of
/// input) does.
fn pause(out: &mut dyn Write, input: &mut dyn BufRead, interactive: bool) -> io::Result<()> {
    write!(out, "{PAUSE_PROMPT}")?;
    out.flush()?;
    if interactive {
        wait_for_key()?;
    } else {
        let mut line = String::new();
        input.read_line(&mut line)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Raw mode for the lifetime of the guard; the terminal is restored on drop.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "Cannot restore terminal mode");
        }
    }
}

fn wait_for_key() -> io::Result<()> {
    let _raw = RawModeGuard::enable()?;
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
