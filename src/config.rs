//! Runtime configuration and per-chromosome file naming.
//!
//! The progress interval is process-wide state set once at startup and read
//! by every filter invocation, so it lives in an atomic rather than being
//! threaded through each call.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of compared rows between progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

static PROGRESS_INTERVAL: AtomicU64 = AtomicU64::new(DEFAULT_PROGRESS_INTERVAL);

/// Set how many compared rows pass between progress messages.
///
/// Zero disables progress messages entirely.
///
/// # Example
///
/// ```
/// use filter_mis_output::config;
///
/// config::set_progress_interval(50_000);
/// assert_eq!(config::progress_interval(), 50_000);
/// # config::set_progress_interval(config::DEFAULT_PROGRESS_INTERVAL);
/// ```
#[inline]
pub fn set_progress_interval(rows: u64) {
    PROGRESS_INTERVAL.store(rows, Ordering::Release);
}

/// Current progress interval.
#[inline]
pub fn progress_interval() -> u64 {
    PROGRESS_INTERVAL.load(Ordering::Acquire)
}

/// Whether a progress message is due after `compared` rows.
#[inline]
pub fn progress_due(compared: u64) -> bool {
    let interval = progress_interval();
    interval != 0 && compared % interval == 0
}

/// The four files touched when filtering one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeFiles {
    pub dosage_input: PathBuf,
    pub info_input: PathBuf,
    pub dosage_output: PathBuf,
    pub info_output: PathBuf,
}

impl ChromosomeFiles {
    /// Standard imputation server names for chromosome `chrom`.
    ///
    /// Inputs are `chr{N}.dose.vcf.gz` and `chr{N}.info.gz`; outputs add a
    /// `-filtered` tag after the chromosome.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input_dir: P, output_dir: Q, chrom: u32) -> Self {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        Self {
            dosage_input: input_dir.join(format!("chr{}.dose.vcf.gz", chrom)),
            info_input: input_dir.join(format!("chr{}.info.gz", chrom)),
            dosage_output: output_dir.join(format!("chr{}-filtered.dose.vcf.gz", chrom)),
            info_output: output_dir.join(format!("chr{}-filtered.info.gz", chrom)),
        }
    }
}
