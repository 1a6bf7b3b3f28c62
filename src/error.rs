use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced by the core pipeline.
///
/// The classification matters to callers: the CLI maps `ProfileNotFound` to
/// exit code 1 and everything else to a generic fatal code, and the run
/// pipeline aborts before any mutation on `BackupCollision` so a merge is
/// never attempted without a safety copy.
#[derive(Debug, Error)]
pub enum Error {
    /// No search root yielded a usable profile, via registry or fallback scan.
    #[error("no profile directory found under any search root")]
    ProfileNotFound,

    /// A registry file existed but contained no usable profile section.
    /// Recovered internally by the fallback scan; only surfaced when callers
    /// parse a registry directly.
    #[error("registry file {0:?} has no parseable profile section")]
    MalformedRegistry(PathBuf),

    /// The timestamped snapshot directory already exists. Failing loudly here
    /// beats silently merging new copies into an older snapshot.
    #[error("backup directory {0:?} already exists")]
    BackupCollision(PathBuf),

    /// The preset file is not valid TOML or lacks the expected table.
    #[error("failed to parse preset {path:?}: {message}")]
    PresetParse { path: PathBuf, message: String },

    /// A preset entry carried a value type the override format cannot express.
    #[error("preset key {key:?} has unsupported value type {found}")]
    UnsupportedValue { key: String, found: &'static str },

    #[error("I/O failure on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
