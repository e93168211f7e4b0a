//! Command implementations for filter-mis-output.

pub mod batch;
pub mod filter;

pub use batch::{BatchCommand, BatchSummary, ChromosomeOutcome, FailurePolicy};
pub use filter::{copy_dosage_header, copy_info_header, FilterImputedCommand, FilterStats};
