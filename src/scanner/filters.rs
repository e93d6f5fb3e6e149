//! Exclusion filters for the directory walk and for classified entities.
//!
//! A [`FileFilter`] sees each walk entry before classification; excluding a
//! directory prunes its whole subtree. A [`MediaFilter`] sees entities after
//! metadata resolution. Filters only ever exclude, so the order they run in
//! does not change the result.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use kourai_common::paths::{has_extension, normalize_extensions};
use kourai_common::{Error, Result};
use kourai_parser::MediaEntity;
use regex::Regex;

/// Files whose name contains the word "sample" are skipped by default.
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"(?i)\bsample\b";

/// What a file filter gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct EntryInfo<'a> {
    pub path: &'a Path,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

impl EntryInfo<'_> {
    /// Final path component, lossily converted.
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }
}

/// Predicate over walk entries.
pub trait FileFilter: Send + Sync + fmt::Debug {
    /// Whether `entry` (and, for a directory, everything below it) is skipped.
    fn excludes(&self, entry: &EntryInfo<'_>) -> bool;
}

/// Predicate over classified (and possibly resolved) entities.
pub trait MediaFilter: Send + Sync + fmt::Debug {
    /// Whether `entity` is dropped before link planning.
    fn excludes(&self, entity: &MediaEntity) -> bool;
}

// ---------------------------------------------------------------------------
// File filters
// ---------------------------------------------------------------------------

/// Keeps files with an allowed extension. Directories always pass.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: normalize_extensions(extensions),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl FileFilter for ExtensionFilter {
    fn excludes(&self, entry: &EntryInfo<'_>) -> bool {
        !entry.is_dir && !has_extension(entry.path, &self.extensions)
    }
}

/// Keeps files modified strictly inside `(after, before)`.
///
/// Either bound may be open. Directories, and files whose modification time
/// cannot be read, always pass.
#[derive(Debug, Clone, Default)]
pub struct ModifiedFilter {
    after: Option<SystemTime>,
    before: Option<SystemTime>,
}

impl ModifiedFilter {
    pub fn new(after: Option<SystemTime>, before: Option<SystemTime>) -> Self {
        Self { after, before }
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }
}

impl FileFilter for ModifiedFilter {
    fn excludes(&self, entry: &EntryInfo<'_>) -> bool {
        if entry.is_dir {
            return false;
        }
        let Some(mtime) = entry.modified else {
            return false;
        };
        let too_old = self.after.is_some_and(|after| mtime <= after);
        let too_new = self.before.is_some_and(|before| mtime >= before);
        too_old || too_new
    }
}

/// Skips entries whose name matches any pattern.
///
/// Patterns are regular expressions matched anywhere in the entry's name. A
/// `glob:` prefix marks a shell-style glob instead, which must match the
/// whole name.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// Compile `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first pattern that does not
    /// compile.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// The always-on filter for sample files.
    pub fn default_excludes() -> Self {
        Self {
            patterns: vec![Regex::new(DEFAULT_EXCLUDE_PATTERN).expect("static pattern compiles")],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }
}

impl FileFilter for PatternFilter {
    fn excludes(&self, entry: &EntryInfo<'_>) -> bool {
        self.matches(&entry.name())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    let source = match pattern.strip_prefix("glob:") {
        Some(glob) => glob_to_regex(glob),
        None => pattern.to_string(),
    };
    Regex::new(&source)
        .map_err(|e| Error::invalid_input(format!("bad exclude pattern {pattern:?}: {e}")))
}

/// Translate a shell glob into an anchored regex. `*` and `?` never cross a
/// path separator.
fn glob_to_regex(glob: &str) -> String {
    let mut re = String::with_capacity(glob.len() + 2);
    re.push('^');
    for c in glob.chars() {
        match c {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    re
}

// ---------------------------------------------------------------------------
// Media filters
// ---------------------------------------------------------------------------

/// Drops entities produced in any of the given countries.
///
/// Country codes compare case-insensitively. Entities with no known
/// countries (for instance because resolution failed) always pass.
#[derive(Debug, Clone, Default)]
pub struct CountryFilter {
    countries: HashSet<String>,
}

impl CountryFilter {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            countries: codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl MediaFilter for CountryFilter {
    fn excludes(&self, entity: &MediaEntity) -> bool {
        entity
            .countries()
            .iter()
            .any(|c| self.countries.contains(&c.to_lowercase()))
    }
}
