//! Exclusion pattern matching for the tree walk.
//!
//! The pattern is a regular expression tested (unanchored) against the raw
//! bytes of the full path of every visited entry, directories included.

use std::borrow::Cow;
use std::path::Path;

use regex::bytes::Regex;

use super::error::{HashWalkError, Result};

/// Optional compiled exclusion pattern. The empty filter matches nothing.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    pattern: Option<Regex>,
}

impl ExcludeFilter {
    /// Filter that excludes nothing.
    pub fn none() -> Self {
        Self { pattern: None }
    }

    /// Compile `pattern`; an empty string excludes nothing.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self::none());
        }
        let regex = Regex::new(pattern)
            .map_err(|source| HashWalkError::InvalidExcludePattern { source })?;
        Ok(Self {
            pattern: Some(regex),
        })
    }

    /// Build from an optional pattern, as handed over by the CLI.
    pub fn from_option(pattern: Option<&str>) -> Result<Self> {
        match pattern {
            Some(p) => Self::new(p),
            None => Ok(Self::none()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn matches(&self, path: &Path) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(&path_bytes(path)),
            None => false,
        }
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}
