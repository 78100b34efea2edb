//! venvboot CLI library.

mod cli;
pub mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::io::{self, IsTerminal};

use venvboot_core::config::{self, BootstrapConfig};
use venvboot_core::observability;
use venvboot_env::{EnvLayout, SystemRunner};

use commands::bootstrap::{self, Bootstrapper};

/// Parse args, resolve the root, load `<root>/.env`, and dispatch.
/// Returns the process exit code.
pub fn run_cli() -> Result<i32> {
    let cli = Cli::parse();

    let root = bootstrap::resolve_root(cli.root.as_deref())?;
    let dotenv_applied = config::load_dotenv_from_dir(&root);
    observability::init_tracing();
    tracing::info!(root = %root.display(), "Working root");
    tracing::debug!(applied = dotenv_applied, "Loaded .env");

    let cfg = BootstrapConfig::from_env(root).with_cli_overrides(cli.overrides());

    match cli.command {
        None => {
            bootstrap::enter_root(&cfg.root)?;
            let stdout = io::stdout();
            let stderr = io::stderr();
            let stdin = io::stdin();
            let report = Bootstrapper::new(&cfg, &SystemRunner)
                .interactive(stdin.is_terminal())
                .run(&mut stdout.lock(), &mut stderr.lock(), &mut stdin.lock());
            Ok(report.exit_code())
        }
        Some(Commands::Status { json }) => {
            let layout = EnvLayout::from_config(&cfg);
            commands::status::cmd_status(&layout, json, &mut io::stdout().lock())?;
            Ok(0)
        }
        Some(Commands::Clean { dry_run, force }) => {
            let layout = EnvLayout::from_config(&cfg);
            commands::clean::cmd_clean(
                &layout,
                dry_run,
                force,
                &mut io::stderr().lock(),
                &mut io::stdin().lock(),
            )?;
            Ok(0)
        }
    }
}
