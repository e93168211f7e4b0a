//! Line-oriented output that transparently handles gzip.
//!
//! Output is staged in a temporary file next to the destination and
//! renamed into place by [`LineWriter::finish`]. A writer dropped without
//! finishing removes its temporary file, so an aborted run never leaves a
//! truncated file under the destination name.
//!
//! Files that must appear together are sealed first and renamed after
//! every one of them was flushed; see [`publish_pair`].

use crate::error::{FilterError, Result};
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use crate::streaming::reader::has_gzip_suffix;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

enum Encoder {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

impl Encoder {
    #[inline]
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Encoder::Plain(w) => w as &mut dyn Write,
            Encoder::Gzip(w) => w as &mut dyn Write,
        }
    }
}

/// Buffered line writer over a plain or gzip-compressed file.
pub struct LineWriter {
    encoder: Encoder,
    temp_path: TempPath,
    path: PathBuf,
    lines_written: u64,
}

impl LineWriter {
    /// Create a writer for `path`, compressing if it ends in `.gz`.
    ///
    /// Fails immediately if the destination directory is not writable.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| FilterError::io(path, e))?;
        let (file, temp_path) = temp.into_parts();
        set_readable(&file).map_err(|e| FilterError::io(path, e))?;

        let encoder = if has_gzip_suffix(path) {
            Encoder::Gzip(BufWriter::with_capacity(
                DEFAULT_OUTPUT_BUFFER,
                GzEncoder::new(file, Compression::default()),
            ))
        } else {
            Encoder::Plain(BufWriter::with_capacity(DEFAULT_OUTPUT_BUFFER, file))
        };

        Ok(Self {
            encoder,
            temp_path,
            path: path.to_path_buf(),
            lines_written: 0,
        })
    }

    /// Write a line followed by a newline.
    #[inline]
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        let w = self.encoder.writer();
        w.write_all(line)
            .and_then(|_| w.write_all(b"\n"))
            .map_err(|e| FilterError::io(&self.path, e))?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and finalize compression without publishing.
    ///
    /// The staged file is complete on disk afterwards but still lives under
    /// its temporary name; it is removed if the returned value is dropped.
    pub fn seal(self) -> Result<SealedOutput> {
        let path = self.path;
        let err = |e| FilterError::io(&path, e);
        match self.encoder {
            Encoder::Plain(w) => {
                w.into_inner().map_err(|e| err(e.into_error()))?;
            }
            Encoder::Gzip(w) => {
                let gz = w.into_inner().map_err(|e| err(e.into_error()))?;
                gz.finish().map_err(err)?;
            }
        }
        Ok(SealedOutput {
            temp_path: self.temp_path,
            path,
        })
    }

    /// Flush, finalize compression, and move the file into place.
    pub fn finish(self) -> Result<()> {
        self.seal()?.publish()
    }
}

/// A fully written output waiting to be renamed into place.
pub struct SealedOutput {
    temp_path: TempPath,
    path: PathBuf,
}

impl SealedOutput {
    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the staged file to its destination.
    pub fn publish(self) -> Result<()> {
        let path = self.path;
        self.temp_path
            .persist(&path)
            .map_err(|e| FilterError::io(&path, e.error))
    }
}

/// Publish two outputs that only make sense together.
///
/// Both writers are sealed before either is renamed, so a flush or
/// compression failure on the second leaves neither destination touched.
/// If the second rename fails, the first published file is removed again.
pub fn publish_pair(first: LineWriter, second: LineWriter) -> Result<()> {
    let first = first.seal()?;
    let second = second.seal()?;
    let first_path = first.path().to_path_buf();
    first.publish()?;
    if let Err(e) = second.publish() {
        if let Err(rm) = std::fs::remove_file(&first_path) {
            tracing::warn!(
                "cannot remove {} after failed publish: {}",
                first_path.display(),
                rm
            );
        }
        return Err(e);
    }
    Ok(())
}

// Temporary files are created owner-only; published output should not be.
#[cfg(unix)]
fn set_readable(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable(_file: &File) -> std::io::Result<()> {
    Ok(())
}
