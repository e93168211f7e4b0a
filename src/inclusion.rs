//! Variant inclusion list.
//!
//! Whitespace-delimited records; the first token of each non-empty line is
//! a variant identifier to keep. Everything after it is ignored.
//! Identifiers are compared as raw bytes.

use rustc_hash::FxHashSet;
use std::io::BufRead;
use std::path::Path;

use crate::error::{FilterError, Result};
use crate::streaming::parsing::first_token;
use crate::streaming::LineReader;

/// Set of variant identifiers to retain.
#[derive(Debug, Clone, Default)]
pub struct InclusionIndex {
    ids: FxHashSet<Box<[u8]>>,
}

impl InclusionIndex {
    /// Create an empty index. Nothing matches an empty index.
    pub fn new() -> Self {
        Self {
            ids: FxHashSet::default(),
        }
    }

    /// Load an index from a file, plain or gzip-compressed.
    ///
    /// An empty path yields an empty index rather than an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self::new());
        }
        let mut reader = LineReader::open(path)?;
        let mut index = Self::new();
        let mut line = Vec::new();
        while reader.read_line(&mut line)? {
            if let Some(id) = first_token(&line) {
                index.insert(id);
            }
        }
        Ok(index)
    }

    /// Load an index from any buffered reader.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut index = Self::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| FilterError::io("<reader>", e))?;
            if n == 0 {
                break;
            }
            if let Some(id) = first_token(&line) {
                index.insert(id);
            }
        }
        Ok(index)
    }

    /// Add an identifier. Re-inserting is a no-op.
    pub fn insert<S: AsRef<[u8]> + ?Sized>(&mut self, id: &S) {
        let id = id.as_ref();
        if !self.ids.contains(id) {
            self.ids.insert(id.into());
        }
    }

    /// Check whether an identifier is retained.
    #[inline]
    pub fn contains<S: AsRef<[u8]> + ?Sized>(&self, id: &S) -> bool {
        self.ids.contains(id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: AsRef<[u8]>> FromIterator<S> for InclusionIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut index = Self::new();
        for id in iter {
            index.insert(id.as_ref());
        }
        index
    }
}
