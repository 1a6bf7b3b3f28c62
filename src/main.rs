use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use prefpatch::config;
use prefpatch::preset::load_preset;
use prefpatch::run::{execute, RunOptions};
use prefpatch::Error;

/// Merge a declarative batch of preference overrides into the default
/// browser profile, taking a timestamped backup first.
#[derive(Debug, Parser)]
#[command(name = "prefpatch", version)]
struct Cli {
    /// Preset file with the `[prefs]` table of overrides to merge.
    #[arg(long, value_name = "FILE")]
    preset: PathBuf,

    /// Supplemental override file appended verbatim after the merge.
    /// Defaults to `local-overrides.js` in the working directory and is
    /// silently skipped when absent.
    #[arg(long, value_name = "FILE")]
    supplement: Option<PathBuf>,

    /// Extra search roots tried before the configured ones (repeatable).
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Resolve the profile and report without mutating anything.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("prefpatch: {err:#}");
            match err.downcast_ref::<Error>() {
                Some(Error::ProfileNotFound) => ExitCode::from(1),
                _ => ExitCode::from(2),
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let app_config = config::load_or_default()?;
    let home = config::home_root()?;
    let mut search_roots = cli.roots;
    search_roots.extend(config::resolved_search_roots(&app_config, &home));

    let preset = load_preset(&cli.preset)
        .with_context(|| format!("Failed to load preset {:?}", cli.preset))?;

    let supplemental_path = cli
        .supplement
        .or_else(|| Some(PathBuf::from("local-overrides.js")));

    let options = RunOptions {
        search_roots,
        product_label: app_config.product_label.clone(),
        backup_root: app_config.backup_root.clone(),
        override_file_name: app_config.override_file_name.clone(),
        entries: preset.entries,
        supplemental_path,
        dry_run: cli.dry_run,
    };
    let report = execute(&options)?;

    println!("profile: {}", report.profile.profile_dir.display());
    if cli.dry_run {
        println!("dry run: no changes written");
        return Ok(());
    }
    if let Some(dir) = &report.backup_dir {
        println!("backup:  {}", dir.display());
    }
    println!(
        "merged {} override(s) into {}",
        report.applied,
        report.override_path.display()
    );
    if report.supplemental_applied {
        println!("appended supplemental overrides");
    }
    Ok(())
}
