//! Supplemental override appending.
//!
//! Runs after the merge engine. The caller-supplied file, when present, is
//! appended verbatim behind a separator comment, with no parsing,
//! validation, or deduplication against keys already set. The host application's own
//! last-statement-wins semantics resolve any duplicates.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::prefs::PreferenceFile;

/// Appends the contents of `override_path` to `file` if it exists.
///
/// Returns whether an override source was found and applied.
pub fn append_overrides(file: &mut PreferenceFile, override_path: &Path) -> Result<bool> {
    if !override_path.is_file() {
        debug!("no supplemental override file at {:?}", override_path);
        return Ok(false);
    }
    let content = fs::read_to_string(override_path).map_err(|e| Error::io(override_path, e))?;
    file.push_comment(&format!(
        "supplemental overrides appended from {}",
        override_path.display()
    ));
    file.append_verbatim(&content);
    info!("appended supplemental overrides from {:?}", override_path);
    Ok(true)
}
