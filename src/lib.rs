//! prefpatch: locate a browser profile and merge typed preference
//! overrides into its override file, idempotently.
//!
//! The crate splits into pure discovery ([`locator`], [`registry`]), the
//! line-oriented merge engine ([`prefs`]), the pre-mutation snapshot
//! ([`backup`]), and verbatim supplemental appending ([`overrides`]).
//! [`run`] wires them into the strict resolve, snapshot, merge, append
//! sequence.

pub mod backup;
pub mod config;
pub mod error;
pub mod locator;
pub mod overrides;
pub mod prefs;
pub mod preset;
pub mod registry;
pub mod run;

// Re-export commonly used types for convenience.
pub use error::Error;
pub use locator::ResolvedProfile;
pub use prefs::{PrefValue, PreferenceFile};
pub use run::{execute, RunOptions, RunReport};
