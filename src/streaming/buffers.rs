//! Buffer size constants for streaming operations.
//!
//! These constants control memory usage vs I/O throughput tradeoffs.
//! Dosage lines are wide (one column per sample), so the line buffer
//! starts much larger than for narrow tabular formats.

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default input buffer size (256 KB).
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default line buffer capacity for dosage rows (64 KB).
/// A few thousand samples per row is typical.
pub const DEFAULT_DOSAGE_LINE_BUFFER: usize = 64 * 1024;

/// Default line buffer capacity for info and inclusion rows (1 KB).
pub const DEFAULT_LINE_BUFFER: usize = 1024;

/// Suffix that selects gzip handling in the stream engine.
pub const GZIP_SUFFIX: &str = ".gz";
