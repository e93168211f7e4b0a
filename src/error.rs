//! Error taxonomy shared by every stage of a filtering run.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which of the paired input files an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Dosage,
    Info,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Dosage => write!(f, "dosage"),
            FileKind::Info => write!(f, "info"),
        }
    }
}

/// Errors that can occur while filtering imputation output.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("missing header data for {kind} file \"{}\"", .path.display())]
    MissingHeader { kind: FileKind, path: PathBuf },

    #[error(
        "line mismatch for dose variant \"{dose_id}\"/info variant \"{info_id}\" \
         after {compared} matched rows"
    )]
    Desync {
        dose_id: String,
        info_id: String,
        compared: u64,
    },

    #[error("missing column {column} at line {line} of \"{}\"", .path.display())]
    MissingColumn {
        path: PathBuf,
        line: u64,
        column: usize,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Attach a path to an I/O error.
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        FilterError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for malformed-file conditions (missing headers, columns, desync).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            FilterError::MissingHeader { .. }
                | FilterError::Desync { .. }
                | FilterError::MissingColumn { .. }
        )
    }

    /// Process exit code for this error.
    ///
    /// Domain failures exit with 1; stream engine failures are not
    /// recognized domain conditions and exit with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            FilterError::Io { .. } => 2,
            _ => 1,
        }
    }
}
