//! ProcessRunner trait: the seam between the bootstrap sequence and external tools.
//!
//! The system runner inherits stdio so the tools' own output and diagnostics
//! reach the user unchanged. Tests substitute a recording runner.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use venvboot_core::observability;

use crate::error::{EnvError, Step};

/// One external tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub step: Step,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    /// Variables set for the child only
    pub env_set: Vec<(OsString, OsString)>,
    /// Variables removed for the child only
    pub env_remove: Vec<OsString>,
}

impl Invocation {
    pub fn new(step: Step, program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            step,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env_set: Vec::new(),
            env_remove: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn env(&mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) {
        let key = key.as_ref().to_os_string();
        self.env_remove.retain(|k| *k != key);
        self.env_set.retain(|(k, _)| *k != key);
        self.env_set.push((key, value.as_ref().to_os_string()));
    }

    pub fn env_remove(&mut self, key: impl AsRef<OsStr>) {
        let key = key.as_ref().to_os_string();
        self.env_set.retain(|(k, _)| *k != key);
        self.env_remove.push(key);
    }

    /// Value this invocation sets for `key`, if any.
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env_set
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.cwd);
        for key in &self.env_remove {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env_set {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Extension point for launching external tools.
pub trait ProcessRunner {
    /// Run to completion. `Ok(None)` means the child ended without an exit code
    /// (killed by a signal).
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>>;
}

/// Spawns real processes with inherited stdin/stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        let status = invocation
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code())
    }
}

/// Run one step with logging and audit, mapping a non-zero exit to [`EnvError`].
pub fn run_step(runner: &dyn ProcessRunner, invocation: &Invocation) -> Result<(), EnvError> {
    let step = invocation.step;
    let program = invocation.program.display().to_string();
    let args = invocation.display_args();
    observability::audit_step_started(
        step.as_str(),
        &program,
        &args,
        &invocation.cwd.display().to_string(),
    );
    tracing::info!(step = step.as_str(), program = %program, args = ?args, "Running");

    let started = Instant::now();
    let result = runner.run(invocation);
    let duration_ms = started.elapsed().as_millis() as u64;

    let code = match result {
        Ok(code) => code,
        Err(source) => {
            observability::audit_step_completed(step.as_str(), -1, duration_ms);
            return Err(EnvError::Spawn {
                step,
                program,
                source,
            });
        }
    };
    observability::audit_step_completed(step.as_str(), code.unwrap_or(-1), duration_ms);

    match code {
        Some(0) => {
            tracing::info!(step = step.as_str(), duration_ms, "Step finished");
            Ok(())
        }
        Some(code) => {
            tracing::error!(step = step.as_str(), code, "Step failed");
            Err(EnvError::ToolFailed { step, code })
        }
        None => {
            tracing::error!(step = step.as_str(), "Step terminated by signal");
            Err(EnvError::Terminated { step })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRunner;

    #[test]
    fn test_env_set_overrides_remove() {
        let mut inv = Invocation::new(Step::Install, "python", Path::new("/srv/app"));
        inv.env_remove("PYTHONHOME");
        inv.env("PYTHONHOME", "/opt/py");
        assert!(inv.env_remove.is_empty());
        assert_eq!(inv.env_value("PYTHONHOME"), Some(OsStr::new("/opt/py")));

        inv.env("PYTHONHOME", "/opt/other");
        assert_eq!(inv.env_set.len(), 1);
        assert_eq!(inv.env_value("PYTHONHOME"), Some(OsStr::new("/opt/other")));
    }

    #[test]
    fn test_run_step_maps_exit_codes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runner = RecordingRunner::succeeding();
        runner.install_code = Some(2);
        let inv = Invocation::new(Step::Install, "python", tmp.path()).arg("-m").arg("pip");

        match run_step(&runner, &inv) {
            Err(EnvError::ToolFailed { step, code }) => {
                assert_eq!(step, Step::Install);
                assert_eq!(code, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }

        runner.install_code = None;
        assert!(matches!(
            run_step(&runner, &inv),
            Err(EnvError::Terminated { step: Step::Install })
        ));
        assert_eq!(runner.calls.borrow().len(), 2);
    }

    #[test]
    fn test_system_runner_reports_spawn_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let inv = Invocation::new(
            Step::CreateVenv,
            tmp.path().join("no-such-python"),
            tmp.path(),
        );
        let err = run_step(&SystemRunner, &inv).unwrap_err();
        assert!(matches!(err, EnvError::Spawn { step: Step::CreateVenv, .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
