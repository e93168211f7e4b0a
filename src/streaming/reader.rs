//! Line-oriented input that transparently handles gzip.
//!
//! Compression is chosen by path suffix: `.gz` files are read through a
//! multi-member gzip decoder (so BGZF output from imputation servers
//! works), everything else is read as plain text. Lines are raw bytes;
//! nothing here assumes UTF-8.

use crate::error::{FilterError, Result};
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, GZIP_SUFFIX};
use crate::streaming::parsing::trim_newline;
use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Check whether a path carries the gzip suffix.
pub fn has_gzip_suffix(path: &Path) -> bool {
    path.to_string_lossy().ends_with(GZIP_SUFFIX)
}

/// Strip the gzip suffix, if present.
pub fn strip_gzip_suffix(path: &Path) -> Option<PathBuf> {
    let s = path.to_string_lossy();
    s.strip_suffix(GZIP_SUFFIX).map(PathBuf::from)
}

/// A line reader over a plain or gzip-compressed file.
pub struct LineReader {
    inner: Box<dyn BufRead + Send>,
    path: PathBuf,
    line_number: u64,
}

impl LineReader {
    /// Wrap an existing buffered reader. `path` is used in error messages.
    pub fn new<R: BufRead + Send + 'static>(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Box::new(reader),
            path: path.into(),
            line_number: 0,
        }
    }

    /// Open a file, decompressing if the path ends in `.gz`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FilterError::io(path, e))?;
        let reader: Box<dyn BufRead + Send> = if has_gzip_suffix(path) {
            Box::new(BufReader::with_capacity(
                DEFAULT_INPUT_BUFFER,
                MultiGzDecoder::new(BufReader::new(file)),
            ))
        } else {
            Box::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER, file))
        };
        Ok(Self {
            inner: reader,
            path: path.to_path_buf(),
            line_number: 0,
        })
    }

    /// Open a file, falling back to the uncompressed sibling.
    ///
    /// If `path` cannot be opened and ends in `.gz`, the same path with
    /// the suffix removed is tried instead. The error from the last
    /// attempt is returned when nothing can be opened.
    pub fn open_with_fallback<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(reader) => Ok(reader),
            Err(err) => match strip_gzip_suffix(path) {
                Some(plain) => {
                    tracing::debug!(
                        "cannot open {}, trying uncompressed {}",
                        path.display(),
                        plain.display()
                    );
                    Self::open(plain)
                }
                None => Err(err),
            },
        }
    }

    /// Read the next line into `buf` without its trailing newline.
    ///
    /// Returns false once the stream is exhausted.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        let bytes_read = self
            .inner
            .read_until(b'\n', buf)
            .map_err(|e| FilterError::io(&self.path, e))?;
        if bytes_read == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        trim_newline(buf);
        Ok(true)
    }

    /// Number of lines read so far.
    #[inline]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Path this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
