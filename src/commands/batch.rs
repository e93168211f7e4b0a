//! Run the dual-stream filter over a chromosome working set.
//!
//! Chromosome invocations share nothing but the read-only inclusion index,
//! so they can run sequentially or on the rayon pool.

use crate::chromosome::ChromosomeSet;
use crate::commands::filter::{FilterImputedCommand, FilterStats};
use crate::config::ChromosomeFiles;
use crate::error::{FilterError, Result};
use crate::inclusion::InclusionIndex;
use rayon::prelude::*;
use std::path::PathBuf;

/// What to do when one chromosome fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing chromosome.
    #[default]
    Abort,
    /// Record the failure and keep going with the remaining chromosomes.
    Continue,
}

/// Per-chromosome outcome of a batch.
#[derive(Debug)]
pub struct ChromosomeOutcome {
    pub chromosome: u32,
    pub result: Result<FilterStats>,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Outcomes in ascending chromosome order
    pub outcomes: Vec<ChromosomeOutcome>,
    /// Members of the working set that have no files (outside 1..=22)
    pub skipped: u64,
}

impl BatchSummary {
    /// Counters summed over every successful chromosome.
    pub fn totals(&self) -> FilterStats {
        let mut total = FilterStats::default();
        for outcome in &self.outcomes {
            if let Ok(stats) = &outcome.result {
                total.merge(stats);
            }
        }
        total
    }

    pub fn failures(&self) -> impl Iterator<Item = (u32, &FilterError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.chromosome, e)))
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Process exit code for the batch: 0, or the first failure's code.
    pub fn exit_code(&self) -> i32 {
        self.failures().next().map_or(0, |(_, e)| e.exit_code())
    }
}

/// Batch driver configuration.
#[derive(Debug, Clone)]
pub struct BatchCommand {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub filter: FilterImputedCommand,
    pub policy: FailurePolicy,
    /// Run chromosomes on the rayon pool
    pub parallel: bool,
}

impl BatchCommand {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            filter: FilterImputedCommand::new(),
            policy: FailurePolicy::Abort,
            parallel: false,
        }
    }

    pub fn with_filter(mut self, filter: FilterImputedCommand) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Filter every processable chromosome in `chromosomes`.
    ///
    /// Chromosomes outside 1..=22 are skipped without touching the
    /// filesystem. Under [`FailurePolicy::Abort`] a sequential run stops at
    /// the first failure. A parallel run cannot stop jobs already in flight,
    /// so every job runs and all outcomes are kept. Each failure is logged
    /// once, as it happens.
    pub fn run(&self, chromosomes: &ChromosomeSet, index: &InclusionIndex) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let targets: Vec<u32> = chromosomes.autosomes().collect();
        summary.skipped = chromosomes.len() - targets.len() as u64;
        if summary.skipped > 0 {
            tracing::debug!(
                "skipping {} requested chromosomes without imputation files",
                summary.skipped
            );
        }

        if self.parallel {
            summary.outcomes = targets
                .par_iter()
                .map(|&chrom| self.run_one(chrom, index))
                .collect();
        } else {
            for chrom in targets {
                let outcome = self.run_one(chrom, index);
                let failed = outcome.result.is_err();
                summary.outcomes.push(outcome);
                if failed && self.policy == FailurePolicy::Abort {
                    break;
                }
            }
        }

        summary
    }

    fn run_one(&self, chrom: u32, index: &InclusionIndex) -> ChromosomeOutcome {
        tracing::info!("processing chromosome {}", chrom);
        let files = ChromosomeFiles::new(&self.input_dir, &self.output_dir, chrom);
        let result = self.filter.run_chromosome(&files, index);
        match &result {
            Ok(stats) => tracing::info!("completed chromosome {}: {}", chrom, stats),
            Err(e) => tracing::error!("chromosome {} failed: {}", chrom, e),
        }
        ChromosomeOutcome {
            chromosome: chrom,
            result,
        }
    }
}
