//! `venvboot clean`: remove the virtual environment directory.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use venvboot_env::EnvLayout;

pub fn cmd_clean(
    layout: &EnvLayout,
    dry_run: bool,
    force: bool,
    err: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let venv_dir = layout.venv_dir();

    if !venv_dir.is_dir() {
        writeln!(err, "No virtual environment at {}", venv_dir.display())?;
        return Ok(());
    }
    ensure_removable_venv(layout)?;

    let size = dir_size(&venv_dir);
    writeln!(err, "🗂  {} ({})", venv_dir.display(), format_size(size))?;

    if dry_run {
        writeln!(err, "(Dry run: nothing removed. Drop --dry-run to delete.)")?;
        return Ok(());
    }

    if !force {
        write!(err, "Remove this virtual environment? [y/N] ")?;
        err.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            writeln!(err, "Cancelled.")?;
            return Ok(());
        }
    }

    fs::remove_dir_all(&venv_dir)?;
    tracing::info!(venv = %venv_dir.display(), "Removed virtual environment");
    writeln!(err, "✓ Removed {}, freed {}", venv_dir.display(), format_size(size))?;
    Ok(())
}

/// Only a directory carrying `pyvenv.cfg` and lying strictly inside the root may be
/// removed, so a `--venv-dir` of `.` or `..` can never wipe the project.
fn ensure_removable_venv(layout: &EnvLayout) -> Result<()> {
    let venv_dir = layout.venv_dir();
    if !venv_dir.join("pyvenv.cfg").is_file() {
        bail!(
            "Refusing to remove {}: no pyvenv.cfg, not a virtual environment",
            venv_dir.display()
        );
    }
    let root = layout
        .root()
        .canonicalize()
        .with_context(|| format!("Cannot resolve root {}", layout.root().display()))?;
    let venv = venv_dir
        .canonicalize()
        .with_context(|| format!("Cannot resolve {}", venv_dir.display()))?;
    if venv == root || !venv.starts_with(&root) {
        bail!(
            "Refusing to remove {}: not inside the root {}",
            venv.display(),
            root.display()
        );
    }
    Ok(())
}

/// Total size of a directory, recursively. Symlinks are not followed.
fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let Ok(meta) = entry.path().symlink_metadata() else {
                continue;
            };
            if meta.is_dir() {
                total += dir_size(&entry.path());
            } else {
                total += meta.len();
            }
        }
    }
    total
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_venv(root: &Path) -> EnvLayout {
        let bin = root.join("venv").join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("python"), vec![0u8; 2048]).unwrap();
        fs::write(root.join("venv").join("pyvenv.cfg"), "").unwrap();
        EnvLayout::new(root, "venv", "requirements.txt")
    }

    #[test]
    fn test_clean_missing_venv_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = EnvLayout::new(tmp.path(), "venv", "requirements.txt");
        let mut err = Vec::new();
        let mut input: &[u8] = b"";
        cmd_clean(&layout, false, true, &mut err, &mut input).unwrap();
        assert!(String::from_utf8(err).unwrap().contains("No virtual environment"));
    }

    #[test]
    fn test_clean_dry_run_keeps_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = with_venv(tmp.path());
        let mut err = Vec::new();
        let mut input: &[u8] = b"";
        cmd_clean(&layout, true, false, &mut err, &mut input).unwrap();
        assert!(layout.venv_dir().exists());
        assert!(String::from_utf8(err).unwrap().contains("2.0 KB"));
    }

    #[test]
    fn test_clean_declined_keeps_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = with_venv(tmp.path());
        let mut err = Vec::new();
        let mut input: &[u8] = b"n\n";
        cmd_clean(&layout, false, false, &mut err, &mut input).unwrap();
        assert!(layout.venv_dir().exists());
    }

    #[test]
    fn test_clean_confirmed_removes_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = with_venv(tmp.path());
        let mut err = Vec::new();
        let mut input: &[u8] = b"yes\n";
        cmd_clean(&layout, false, false, &mut err, &mut input).unwrap();
        assert!(!layout.venv_dir().exists());
    }

    #[test]
    fn test_clean_refuses_root_itself() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("pyvenv.cfg"), "").unwrap();
        fs::write(tmp.path().join("main.py"), "print('hi')\n").unwrap();
        let layout = EnvLayout::new(tmp.path(), ".", "requirements.txt");
        let mut err = Vec::new();
        let mut input: &[u8] = b"";

        let e = cmd_clean(&layout, false, true, &mut err, &mut input).unwrap_err();
        assert!(e.to_string().contains("not inside the root"));
        assert!(tmp.path().join("main.py").exists());
    }

    #[test]
    fn test_clean_refuses_parent_of_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("project");
        fs::create_dir_all(&root).unwrap();
        fs::write(tmp.path().join("pyvenv.cfg"), "").unwrap();
        let layout = EnvLayout::new(&root, "..", "requirements.txt");
        let mut err = Vec::new();
        let mut input: &[u8] = b"y\n";

        assert!(cmd_clean(&layout, false, false, &mut err, &mut input).is_err());
        assert!(root.exists());
    }

    #[test]
    fn test_clean_refuses_dir_without_pyvenv_cfg() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("results.csv"), "a,b\n").unwrap();
        let layout = EnvLayout::new(tmp.path(), "data", "requirements.txt");
        let mut err = Vec::new();
        let mut input: &[u8] = b"";

        let e = cmd_clean(&layout, false, true, &mut err, &mut input).unwrap_err();
        assert!(e.to_string().contains("not a virtual environment"));
        assert!(data.join("results.csv").exists());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
