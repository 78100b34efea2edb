//! `venvboot status`: inspect the venv and manifest without spawning anything.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use venvboot_env::builder::{manifest_state, parse_requirements, ManifestState};
use venvboot_env::EnvLayout;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub root: String,
    pub venv_dir: String,
    pub venv_exists: bool,
    pub interpreter: Option<String>,
    pub manifest: String,
    pub manifest_present: bool,
    pub requirements: usize,
    pub manifest_state: ManifestState,
}

pub fn collect_status(layout: &EnvLayout) -> Result<StatusReport> {
    let manifest_present = layout.manifest_present();
    let requirements = if manifest_present {
        let content = std::fs::read_to_string(layout.manifest())?;
        parse_requirements(&content).len()
    } else {
        0
    };
    Ok(StatusReport {
        root: layout.root().display().to_string(),
        venv_dir: layout.venv_dir().display().to_string(),
        venv_exists: layout.venv_dir().is_dir(),
        interpreter: layout
            .is_created()
            .then(|| layout.interpreter().display().to_string()),
        manifest: layout.manifest().display().to_string(),
        manifest_present,
        requirements,
        manifest_state: manifest_state(layout)?,
    })
}

pub fn cmd_status(layout: &EnvLayout, json: bool, out: &mut dyn Write) -> Result<()> {
    let report = collect_status(layout)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "Root:         {}", report.root)?;
    if report.venv_exists {
        writeln!(out, "Venv:         {}", report.venv_dir)?;
    } else {
        writeln!(out, "Venv:         {} (missing)", report.venv_dir)?;
    }
    match &report.interpreter {
        Some(p) => writeln!(out, "Interpreter:  {}", p)?,
        None => writeln!(out, "Interpreter:  -")?,
    }
    if report.manifest_present {
        let state = serde_json::to_value(report.manifest_state)?;
        writeln!(
            out,
            "Manifest:     {} ({} requirement(s), {})",
            report.manifest,
            report.requirements,
            state.as_str().unwrap_or_default()
        )?;
    } else {
        writeln!(out, "Manifest:     {} (not found)", report.manifest)?;
    }
    Ok(())
}
