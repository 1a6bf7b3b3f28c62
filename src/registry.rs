//! Parser for the profile registry file (`profiles.ini`).
//!
//! The registry is INI-like text: bracketed sections, one `[ProfileN]`
//! section per installed profile, each carrying `Path=<dir>` and optionally
//! `Default=1`. This module only parses and selects; it never touches the
//! filesystem beyond reading the file handed to it.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// One `[ProfileN]` section from the registry, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryProfile {
    /// The `Path=` value, relative to the registry's directory or absolute.
    pub path: String,
    /// Whether the section carried `Default=1`.
    pub is_default: bool,
    /// Position of the section among profile sections in the file.
    pub section_order: usize,
}

/// Parses registry text into profile records, preserving file order.
///
/// Sections whose header does not match `Profile<N>` for integer N are
/// skipped wholesale, as are profile sections missing a `Path=` line.
pub fn parse_registry(text: &str) -> Vec<RegistryProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<(String, bool)> = None;

    let finish = |current: &mut Option<(String, bool)>, profiles: &mut Vec<RegistryProfile>| {
        if let Some((path, is_default)) = current.take() {
            if !path.is_empty() {
                profiles.push(RegistryProfile {
                    path,
                    is_default,
                    section_order: profiles.len(),
                });
            }
        }
    };

    for line in text.lines() {
        let line = line.trim();
        if let Some(name) = section_header(line) {
            finish(&mut current, &mut profiles);
            if is_profile_section(name) {
                current = Some((String::new(), false));
            }
            continue;
        }
        let Some((path, is_default)) = current.as_mut() else {
            continue;
        };
        if let Some(value) = line.strip_prefix("Path=") {
            *path = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Default=") {
            if value.trim() == "1" {
                *is_default = true;
            }
        }
    }
    finish(&mut current, &mut profiles);
    profiles
}

/// Reads and parses a registry file, failing if no profile section is usable.
pub fn load_registry(path: &Path) -> Result<Vec<RegistryProfile>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let profiles = parse_registry(&text);
    if profiles.is_empty() {
        return Err(Error::MalformedRegistry(path.to_path_buf()));
    }
    debug!("parsed {} profile section(s) from {:?}", profiles.len(), path);
    Ok(profiles)
}

/// Selection tie-break: the first section claiming `Default=1` wins; extra
/// default claims in malformed input are ignored. With no default claim, the
/// first profile in file order is authoritative.
pub fn select_profile(profiles: &[RegistryProfile]) -> Option<&RegistryProfile> {
    profiles
        .iter()
        .find(|p| p.is_default)
        .or_else(|| profiles.first())
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

fn is_profile_section(name: &str) -> bool {
    match name.strip_prefix("Profile") {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
