//! The linear merge pipeline.
//!
//! Resolve the profile, snapshot its state files, apply the preference
//! batch, then append supplemental overrides. Strictly sequential, no
//! retries:
//! any fatal error aborts the run, and partial progress (a backup already
//! taken) is deliberately left in place since it is itself the recovery
//! mechanism.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use crate::backup;
use crate::locator::{self, ResolvedProfile};
use crate::overrides::append_overrides;
use crate::prefs::{PrefValue, PreferenceFile};

/// Everything a run needs, passed explicitly; no ambient state.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Candidate installation roots, in priority order.
    pub search_roots: Vec<PathBuf>,
    /// Product label for the backup directory name and file header.
    pub product_label: String,
    /// Where the snapshot directory is created; defaults to the resolved
    /// installation root.
    pub backup_root: Option<PathBuf>,
    /// File name of the override file inside the profile directory.
    pub override_file_name: String,
    /// The ordered preference batch; later entries for a key win.
    pub entries: Vec<(String, PrefValue)>,
    /// Optional supplemental file appended verbatim after the merge.
    pub supplemental_path: Option<PathBuf>,
    /// Resolve and report without touching the filesystem.
    pub dry_run: bool,
}

/// What a run did, for callers that report to a user.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub profile: ResolvedProfile,
    pub override_path: PathBuf,
    pub backup_dir: Option<PathBuf>,
    pub applied: usize,
    pub supplemental_applied: bool,
}

/// Executes one full run.
pub fn execute(options: &RunOptions) -> Result<RunReport> {
    let profile = locator::resolve(&options.search_roots)?;
    info!("resolved profile directory {:?}", profile.profile_dir);
    let override_path = profile.profile_dir.join(&options.override_file_name);

    if options.dry_run {
        return Ok(RunReport {
            profile,
            override_path,
            backup_dir: None,
            applied: 0,
            supplemental_applied: false,
        });
    }

    let backup_root = options
        .backup_root
        .clone()
        .unwrap_or_else(|| profile.root_dir.clone());
    let handle = backup::snapshot(&profile.profile_dir, &backup_root, &options.product_label)
        .context("Failed to snapshot profile state before merging")?;

    let mut file = PreferenceFile::open_or_create(&override_path, &header(&options.product_label))
        .context("Failed to open override file")?;
    file.push_comment(&format!(
        "applied {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    for (name, value) in &options.entries {
        file.upsert(name, value);
    }
    file.save().context("Failed to write override file")?;
    info!(
        "merged {} preference override(s) into {:?}",
        options.entries.len(),
        override_path
    );

    let mut supplemental_applied = false;
    if let Some(path) = &options.supplemental_path {
        supplemental_applied =
            append_overrides(&mut file, path).context("Failed to append supplemental overrides")?;
        if supplemental_applied {
            file.save().context("Failed to write override file")?;
        }
    }

    Ok(RunReport {
        profile,
        override_path,
        backup_dir: Some(handle.dir),
        applied: options.entries.len(),
        supplemental_applied,
    })
}

fn header(label: &str) -> String {
    format!(
        "// {label} preference overrides\n\
         // managed by prefpatch; statements below are rewritten in place on\n\
         // each run, one per key, unrelated lines left untouched\n"
    )
}
