//! Profile discovery across heterogeneous installation layouts.
//!
//! Resolution is pure: it inspects the filesystem but never mutates it.
//! Each candidate installation root is tried in caller order (native
//! install first, then sandboxed-package variants); within a root the
//! registry file is authoritative. Only when no root yields a usable
//! registry does the wildcard scan run, accepting the first directory
//! matching a default-profile naming convention in root-then-pattern
//! priority order.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::registry::{load_registry, select_profile};

/// File name of the profile registry inside an installation root.
pub const REGISTRY_FILE_NAME: &str = "profiles.ini";

/// Directory-name suffixes the fallback scan accepts, in priority order.
const DEFAULT_NAME_SUFFIXES: &[&str] = &[".default-release", ".default-esr", ".default"];

/// A candidate directory must hold this file to count as a real profile.
const RECOGNIZED_PREF_FILE: &str = "prefs.js";

/// The one authoritative profile directory for this run.
///
/// Computed once, read-only afterward; every downstream component takes it
/// as an explicit argument rather than reading ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    /// The installation root whose strategy succeeded.
    pub root_dir: PathBuf,
    /// The profile directory itself.
    pub profile_dir: PathBuf,
}

/// Resolves the profile directory from an ordered list of search roots.
pub fn resolve(roots: &[PathBuf]) -> Result<ResolvedProfile> {
    for root in roots {
        if let Some(profile) = resolve_via_registry(root) {
            debug!("registry resolution succeeded under {:?}", root);
            return Ok(profile);
        }
    }
    for root in roots {
        for suffix in DEFAULT_NAME_SUFFIXES {
            if let Some(profile_dir) = scan_for_suffix(root, suffix) {
                debug!("fallback scan matched {:?}", profile_dir);
                return Ok(ResolvedProfile {
                    root_dir: root.clone(),
                    profile_dir,
                });
            }
        }
    }
    Err(Error::ProfileNotFound)
}

/// Registry strategy for a single root. Any failure here (missing or
/// malformed registry, or a registry pointing at a directory that does not
/// exist) marks the root as failed and is recovered by later roots or the
/// wildcard scan, never surfaced on its own.
fn resolve_via_registry(root: &Path) -> Option<ResolvedProfile> {
    let registry_path = root.join(REGISTRY_FILE_NAME);
    if !registry_path.is_file() {
        return None;
    }
    let profiles = match load_registry(&registry_path) {
        Ok(profiles) => profiles,
        Err(err) => {
            warn!("skipping registry at {:?}: {err}", registry_path);
            return None;
        }
    };
    let selected = select_profile(&profiles)?;
    let profile_dir = if Path::new(&selected.path).is_absolute() {
        PathBuf::from(&selected.path)
    } else {
        root.join(&selected.path)
    };
    if !profile_dir.is_dir() {
        warn!(
            "registry {:?} names missing directory {:?}",
            registry_path, profile_dir
        );
        return None;
    }
    Some(ResolvedProfile {
        root_dir: root.to_path_buf(),
        profile_dir,
    })
}

/// First immediate subdirectory of `root` (in name order) whose name ends
/// with `suffix` and which contains a recognizable preference file.
fn scan_for_suffix(root: &Path, suffix: &str) -> Option<PathBuf> {
    if !root.is_dir() {
        return None;
    }
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(suffix) && entry.path().join(RECOGNIZED_PREF_FILE).is_file() {
            return Some(entry.into_path());
        }
    }
    None
}
