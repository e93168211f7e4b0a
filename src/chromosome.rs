//! Chromosome selection.
//!
//! A run can name chromosomes three ways (a single value, a bound range, an
//! explicit list); they are reconciled into one ascending working set.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};
use std::ops::RangeInclusive;

/// Chromosomes with imputation output files.
pub const AUTOSOMES: RangeInclusive<u32> = 1..=22;

/// Requested chromosomes, before reconciliation.
///
/// Zero means "unset" for the single value and both bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromosomeSelector {
    pub chromosome: u32,
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub list: Vec<u32>,
}

impl ChromosomeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single chromosome.
    pub fn with_chromosome(mut self, chrom: u32) -> Self {
        self.chromosome = chrom;
        self
    }

    /// Select a range; either bound may be zero to take its default.
    pub fn with_bounds(mut self, lower: u32, upper: u32) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Select an explicit list of chromosomes.
    pub fn with_list(mut self, list: Vec<u32>) -> Self {
        self.list = list;
        self
    }

    /// Reconcile all selectors into one deduplicated, ascending set.
    ///
    /// A bound range is only used if at least one bound is set; an unset
    /// lower bound defaults to 1 and an unset upper bound to 22. Values
    /// outside 1..=22 are kept here and skipped by the caller. The range
    /// is stored as its bounds, never expanded, so any `u32` bound is cheap.
    pub fn resolve(&self) -> ChromosomeSet {
        let mut listed = BTreeSet::new();

        if self.chromosome != 0 {
            listed.insert(self.chromosome);
        }

        let range = if self.lower_bound != 0 || self.upper_bound != 0 {
            let lower = if self.lower_bound != 0 {
                self.lower_bound
            } else {
                *AUTOSOMES.start()
            };
            let upper = if self.upper_bound != 0 {
                self.upper_bound
            } else {
                *AUTOSOMES.end()
            };
            Some(lower..=upper).filter(|r| !r.is_empty())
        } else {
            None
        };

        listed.extend(self.list.iter().copied().filter(|&c| c != 0));
        ChromosomeSet { listed, range }
    }
}

/// Resolved working set: a contiguous range plus individually named values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromosomeSet {
    listed: BTreeSet<u32>,
    range: Option<RangeInclusive<u32>>,
}

impl ChromosomeSet {
    pub fn contains(&self, chrom: u32) -> bool {
        self.range.as_ref().is_some_and(|r| r.contains(&chrom)) || self.listed.contains(&chrom)
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.listed.is_empty()
    }

    /// Number of distinct chromosomes in the set.
    pub fn len(&self) -> u64 {
        match &self.range {
            Some(r) => {
                let span = u64::from(*r.end()) - u64::from(*r.start()) + 1;
                let outside = self.listed.iter().filter(|&&c| !r.contains(&c)).count();
                span + outside as u64
            }
            None => self.listed.len() as u64,
        }
    }

    /// Every member in ascending order, without duplicates.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match &self.range {
            Some(r) => {
                let (lo, hi) = (*r.start(), *r.end());
                Box::new(
                    self.listed
                        .range(..lo)
                        .copied()
                        .chain(lo..=hi)
                        .chain(self.listed.range((Excluded(hi), Unbounded)).copied()),
                )
            }
            None => Box::new(self.listed.iter().copied()),
        }
    }

    /// Members with imputation files, ascending. Never walks the full range.
    pub fn autosomes(&self) -> impl Iterator<Item = u32> + '_ {
        AUTOSOMES.filter(move |&c| self.contains(c))
    }
}

impl FromIterator<u32> for ChromosomeSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            listed: iter.into_iter().collect(),
            range: None,
        }
    }
}
