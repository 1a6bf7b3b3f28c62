//! Pre-mutation snapshots of profile state files.
//!
//! A snapshot copies every regular file from the profile directory into a
//! timestamp-named directory under the destination root, before the merge
//! engine touches anything. The directory is immutable once written; a
//! name collision (same-second invocation) fails loudly instead of merging
//! into a prior snapshot. Alongside the copies, `manifest.json` records
//! each file's size and SHA-256 digest so fidelity can be checked later.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

const MANIFEST_FILE_NAME: &str = "manifest.json";

/// One copied file, as recorded in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEntry {
    pub file_name: String,
    pub bytes: u64,
    pub sha256: String,
}

/// Machine-readable record of what a snapshot captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    pub created_at: DateTime<Local>,
    pub source_dir: PathBuf,
    pub files: Vec<BackupEntry>,
}

/// Handle to a completed snapshot.
#[derive(Debug, Clone)]
pub struct BackupHandle {
    pub dir: PathBuf,
    pub manifest: BackupManifest,
}

/// Name of the snapshot directory for a product label and moment in time.
pub fn backup_dir_name(label: &str, at: DateTime<Local>) -> String {
    format!("{label}-backup-{}", at.format("%Y%m%d-%H%M%S"))
}

/// Snapshots `source_dir` into a new timestamped directory under
/// `dest_root`, using the current wall-clock time for the name.
pub fn snapshot(source_dir: &Path, dest_root: &Path, label: &str) -> Result<BackupHandle> {
    snapshot_at(source_dir, dest_root, label, Local::now())
}

/// Snapshot with an explicit timestamp. Fails with
/// [`Error::BackupCollision`] if the derived directory already exists, and
/// copies nothing in that case.
pub fn snapshot_at(
    source_dir: &Path,
    dest_root: &Path,
    label: &str,
    at: DateTime<Local>,
) -> Result<BackupHandle> {
    fs::create_dir_all(dest_root).map_err(|e| Error::io(dest_root, e))?;
    let dir = dest_root.join(backup_dir_name(label, at));
    if let Err(err) = fs::create_dir(&dir) {
        return Err(match err.kind() {
            ErrorKind::AlreadyExists => Error::BackupCollision(dir),
            _ => Error::io(dir, err),
        });
    }

    let mut names: Vec<String> = Vec::new();
    let entries = fs::read_dir(source_dir).map_err(|e| Error::io(source_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(source_dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let source = source_dir.join(&name);
        let dest = dir.join(&name);
        let bytes = fs::read(&source).map_err(|e| Error::io(&source, e))?;
        fs::write(&dest, &bytes).map_err(|e| Error::io(&dest, e))?;
        restrict_permissions(&dest)?;
        files.push(BackupEntry {
            file_name: name,
            bytes: bytes.len() as u64,
            sha256: hex_digest(&bytes),
        });
    }

    let manifest = BackupManifest {
        created_at: at,
        source_dir: source_dir.to_path_buf(),
        files,
    };
    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| Error::io(&manifest_path, std::io::Error::other(e)))?;
    fs::write(&manifest_path, json).map_err(|e| Error::io(&manifest_path, e))?;
    restrict_permissions(&manifest_path)?;

    info!(
        "snapshotted {} file(s) from {:?} into {:?}",
        manifest.files.len(),
        source_dir,
        dir
    );
    Ok(BackupHandle { dir, manifest })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
