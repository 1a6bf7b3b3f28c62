//! The idempotent preference override store.
//!
//! The override file is modeled as an ordered sequence of text lines. A
//! subset of lines are statements of the exact shape
//! `statement("<name>", <value>);`. That literal shape is the on-disk
//! contract with the host application and must not vary. Every other line
//! (comments, blanks, statements for keys not touched this run) passes
//! through untouched, in its original position.
//!
//! Statement recognition uses a small tokenizer that parses the opening
//! token and the complete quoted key, closing quote included, rather than a
//! prefix check. Keys where one is a prefix of the other can therefore
//! never cross-match.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// A typed preference value, rendered into the statement grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for PrefValue {
    /// Booleans and integers render as unquoted literals; strings render
    /// double-quoted with internal quotes and backslashes escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{b}"),
            PrefValue::Int(n) => write!(f, "{n}"),
            PrefValue::Str(s) => write!(f, "\"{}\"", escape(s)),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(b: bool) -> Self {
        PrefValue::Bool(b)
    }
}

impl From<i64> for PrefValue {
    fn from(n: i64) -> Self {
        PrefValue::Int(n)
    }
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        PrefValue::Str(s.to_string())
    }
}

const STATEMENT_OPEN: &str = "statement(\"";

/// Renders the full statement line for a key/value pair.
pub fn format_statement(name: &str, value: &PrefValue) -> String {
    format!("statement(\"{}\", {});", escape(name), value)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Extracts the (unescaped) key of a statement line.
///
/// Matching is anchored at line start: the line must begin with the opening
/// token immediately followed by the quoted key. Nothing after the closing
/// quote is inspected, so a trailing value of any shape still matches.
/// Comment lines (`//`) and blanks never begin with the token and so are
/// never recognized.
pub fn statement_key(line: &str) -> Option<String> {
    let rest = line.strip_prefix(STATEMENT_OPEN)?;
    let mut key = String::new();
    let mut chars = rest.chars();
    loop {
        match chars.next()? {
            '"' => return Some(key),
            '\\' => key.push(chars.next()?),
            ch => key.push(ch),
        }
    }
}

/// The on-disk override file, loaded into memory for a run.
///
/// Mutations accumulate in the line buffer; nothing reaches disk until
/// [`PreferenceFile::save`]. The read-modify-write cycle is not atomic
/// across processes, so callers needing multi-process safety must hold an
/// external advisory lock around the whole run.
#[derive(Debug)]
pub struct PreferenceFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl PreferenceFile {
    /// Loads the file at `path`, or initializes a new one from the supplied
    /// header comment block if it does not exist yet.
    pub fn open_or_create(path: &Path, header: &str) -> Result<Self> {
        let lines = if path.exists() {
            let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            text.lines().map(str::to_string).collect()
        } else {
            debug!("initializing new override file at {:?}", path);
            header.lines().map(str::to_string).collect()
        };
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Inserts or replaces the statement for `name`.
    ///
    /// An existing statement is rewritten in place, position preserved; a
    /// new key appends at the end. Calling this twice with identical
    /// arguments leaves the buffer byte-identical to calling it once.
    pub fn upsert(&mut self, name: &str, value: &PrefValue) {
        let rendered = format_statement(name, value);
        match self
            .lines
            .iter()
            .position(|line| statement_key(line).as_deref() == Some(name))
        {
            Some(index) => self.lines[index] = rendered,
            None => self.lines.push(rendered),
        }
    }

    /// Appends a `//` comment line, used for run-timestamp markers and the
    /// supplemental-override separator.
    pub fn push_comment(&mut self, text: &str) {
        self.lines.push(format!("// {text}"));
    }

    /// Appends raw content line by line, without interpretation.
    pub fn append_verbatim(&mut self, content: &str) {
        self.lines.extend(content.lines().map(str::to_string));
    }

    /// Writes the buffer back to disk, one line per entry with a trailing
    /// newline. A failure mid-write can leave a partial file; the snapshot
    /// taken before the merge is the recovery path.
    pub fn save(&self) -> Result<()> {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        fs::write(&self.path, out).map_err(|e| Error::io(&self.path, e))
    }
}
