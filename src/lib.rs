//! filter-mis-output: trim imputation server output to a variant list
//!
//! Imputation servers write one dosage file (`chrN.dose.vcf.gz`) and one
//! info file (`chrN.info.gz`) per chromosome, row-aligned by variant. This
//! library filters both files down to the variants named in an inclusion
//! list while keeping them aligned.
//!
//! # Features
//!
//! - **Streaming I/O**: one pending row per file, gzip in and out
//! - **Alignment checks**: every row pair is matched by variant identifier
//! - **Desync recovery**: optionally discard extra dosage rows
//! - **Parallel chromosomes**: independent chromosomes on the rayon pool
//!
//! # Example
//!
//! ```rust,no_run
//! use filter_mis_output::prelude::*;
//!
//! let index = InclusionIndex::from_file("keep.txt").unwrap();
//! let chromosomes = ChromosomeSelector::new().with_bounds(1, 22).resolve();
//!
//! let summary = BatchCommand::new("imputed", "filtered").run(&chromosomes, &index);
//! println!("{}", summary.totals());
//! ```

pub mod chromosome;
pub mod commands;
pub mod config;
pub mod error;
pub mod inclusion;
pub mod streaming;

// Re-export commonly used types
pub use chromosome::{ChromosomeSelector, ChromosomeSet};
pub use error::{FilterError, Result};
pub use inclusion::InclusionIndex;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chromosome::{ChromosomeSelector, ChromosomeSet};
    pub use crate::commands::{
        BatchCommand, BatchSummary, FailurePolicy, FilterImputedCommand, FilterStats,
    };
    pub use crate::config::ChromosomeFiles;
    pub use crate::error::{FilterError, Result};
    pub use crate::inclusion::InclusionIndex;
}
