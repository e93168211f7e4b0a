//! Synchronized dosage/info filtering for one chromosome.
//!
//! The dosage and info files are row-aligned: row `i` of each describes the
//! same variant. Both inputs are walked in lock-step, the variant identifiers
//! are checked against each other, and rows whose variant is in the
//! inclusion index are copied to both outputs.
//!
//! # Memory Complexity
//!
//! O(1) in the number of variants: one pending line per input.
//!
//! # Desynchronization
//!
//! Some imputation pipelines drop info rows without dropping the matching
//! dosage rows. With `permit_file_desync`, a mismatch discards the pending
//! dosage row and compares the next one against the same info row. Extra
//! info rows are never skipped.

use crate::config::{progress_due, ChromosomeFiles};
use crate::error::{FileKind, FilterError, Result};
use crate::inclusion::InclusionIndex;
use crate::streaming::buffers::{DEFAULT_DOSAGE_LINE_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::{
    is_metadata_line, tab_field_range, DOSAGE_ID_COLUMN, INFO_ID_COLUMN,
};
use crate::streaming::{publish_pair, LineReader, LineWriter};
use std::ops::Range;
use std::path::Path;

/// Counters from filtering one chromosome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Row pairs whose identifiers matched
    pub compared: u64,
    /// Row pairs written to both outputs
    pub retained: u64,
    /// Row pairs not in the inclusion index
    pub dropped: u64,
    /// Dosage rows discarded to resynchronize with the info file
    pub desync_skipped: u64,
}

impl FilterStats {
    /// Fraction of compared rows that were retained; 0.0 if none compared.
    pub fn retained_fraction(&self) -> f64 {
        if self.compared == 0 {
            0.0
        } else {
            self.retained as f64 / self.compared as f64
        }
    }

    /// Add another chromosome's counters to this one.
    pub fn merge(&mut self, other: &FilterStats) {
        self.compared += other.compared;
        self.retained += other.retained;
        self.dropped += other.dropped;
        self.desync_skipped += other.desync_skipped;
    }
}

impl std::fmt::Display for FilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "encountered {} variants, kept {}, removed {} ({:.4})",
            self.compared,
            self.retained,
            self.dropped,
            self.retained_fraction()
        )?;
        if self.desync_skipped > 0 {
            write!(f, ", desync skipped {}", self.desync_skipped)?;
        }
        Ok(())
    }
}

/// One input's pending row and the span of its identifier.
struct RowCursor {
    line: Vec<u8>,
    id: Option<Range<usize>>,
    column: usize,
}

impl RowCursor {
    fn new(column: usize, capacity: usize) -> Self {
        Self {
            line: Vec::with_capacity(capacity),
            id: None,
            column,
        }
    }

    /// Make sure a row is pending. Returns false once the input is exhausted.
    fn fill(&mut self, reader: &mut LineReader) -> Result<bool> {
        if self.id.is_some() {
            return Ok(true);
        }
        if !reader.read_line(&mut self.line)? {
            return Ok(false);
        }
        match tab_field_range(&self.line, self.column) {
            Some(range) => {
                self.id = Some(range);
                Ok(true)
            }
            None => Err(FilterError::MissingColumn {
                path: reader.path().to_path_buf(),
                line: reader.line_number(),
                column: self.column,
            }),
        }
    }

    #[inline]
    fn id(&self) -> &[u8] {
        match &self.id {
            Some(range) => &self.line[range.clone()],
            None => &[],
        }
    }

    #[inline]
    fn clear(&mut self) {
        self.id = None;
    }
}

/// Copy dosage metadata and the column header row verbatim.
///
/// Lines are copied until the first line without the `##` marker; that line
/// is the column header and is copied as the last line of the header, so
/// the row loop starts at the first data row. Returns the number of lines
/// copied.
pub fn copy_dosage_header(input: &mut LineReader, output: &mut LineWriter) -> Result<u64> {
    let mut line = Vec::with_capacity(DEFAULT_LINE_BUFFER);
    let mut copied = 0;
    loop {
        if !input.read_line(&mut line)? {
            return Err(FilterError::MissingHeader {
                kind: FileKind::Dosage,
                path: input.path().to_path_buf(),
            });
        }
        output.write_line(&line)?;
        copied += 1;
        if !is_metadata_line(&line) {
            return Ok(copied);
        }
    }
}

/// Copy the single info header row verbatim.
pub fn copy_info_header(input: &mut LineReader, output: &mut LineWriter) -> Result<()> {
    let mut line = Vec::with_capacity(DEFAULT_LINE_BUFFER);
    if !input.read_line(&mut line)? {
        return Err(FilterError::MissingHeader {
            kind: FileKind::Info,
            path: input.path().to_path_buf(),
        });
    }
    output.write_line(&line)
}

/// Dual-stream filter configuration.
#[derive(Debug, Clone, Default)]
pub struct FilterImputedCommand {
    /// Discard dosage rows until they line up with the info file again
    /// instead of failing on an identifier mismatch.
    pub permit_file_desync: bool,
}

impl FilterImputedCommand {
    pub fn new() -> Self {
        Self {
            permit_file_desync: false,
        }
    }

    pub fn with_permit_file_desync(mut self, permit: bool) -> Self {
        self.permit_file_desync = permit;
        self
    }

    /// Filter the standard file set for one chromosome.
    pub fn run_chromosome(
        &self,
        files: &ChromosomeFiles,
        index: &InclusionIndex,
    ) -> Result<FilterStats> {
        self.run(
            &files.dosage_input,
            &files.info_input,
            index,
            &files.dosage_output,
            &files.info_output,
        )
    }

    /// Filter a dosage/info pair into two outputs.
    ///
    /// Outputs are opened before any input so an unwritable destination
    /// fails before work starts. Inputs ending in `.gz` fall back to the
    /// uncompressed sibling if the compressed file cannot be opened.
    /// Outputs only appear at their destination if the whole pair was
    /// filtered and flushed successfully.
    pub fn run<P: AsRef<Path>>(
        &self,
        dosage_input: P,
        info_input: P,
        index: &InclusionIndex,
        dosage_output: P,
        info_output: P,
    ) -> Result<FilterStats> {
        let mut dose_out = LineWriter::create(dosage_output)?;
        let mut info_out = LineWriter::create(info_output)?;

        let mut dose_in = LineReader::open_with_fallback(dosage_input)?;
        copy_dosage_header(&mut dose_in, &mut dose_out)?;

        let mut info_in = LineReader::open_with_fallback(info_input)?;
        copy_info_header(&mut info_in, &mut info_out)?;

        let stats = self.filter_rows(
            &mut dose_in,
            &mut info_in,
            index,
            &mut dose_out,
            &mut info_out,
        )?;

        publish_pair(dose_out, info_out)?;
        Ok(stats)
    }

    /// Walk both inputs past their headers, copying included row pairs.
    pub fn filter_rows(
        &self,
        dose_in: &mut LineReader,
        info_in: &mut LineReader,
        index: &InclusionIndex,
        dose_out: &mut LineWriter,
        info_out: &mut LineWriter,
    ) -> Result<FilterStats> {
        let mut dose = RowCursor::new(DOSAGE_ID_COLUMN, DEFAULT_DOSAGE_LINE_BUFFER);
        let mut info = RowCursor::new(INFO_ID_COLUMN, DEFAULT_LINE_BUFFER);
        let mut stats = FilterStats::default();

        loop {
            if !dose.fill(dose_in)? || !info.fill(info_in)? {
                break;
            }

            if dose.id() != info.id() {
                if !self.permit_file_desync {
                    return Err(FilterError::Desync {
                        dose_id: String::from_utf8_lossy(dose.id()).into_owned(),
                        info_id: String::from_utf8_lossy(info.id()).into_owned(),
                        compared: stats.compared,
                    });
                }
                tracing::trace!(
                    "dropping dose variant {} to resync with info variant {}",
                    String::from_utf8_lossy(dose.id()),
                    String::from_utf8_lossy(info.id())
                );
                stats.desync_skipped += 1;
                dose.clear();
                continue;
            }

            stats.compared += 1;
            if index.contains(dose.id()) {
                dose_out.write_line(&dose.line)?;
                info_out.write_line(&info.line)?;
                stats.retained += 1;
            } else {
                stats.dropped += 1;
            }

            if progress_due(stats.compared) {
                tracing::debug!("processed {} variants...", stats.compared);
            }

            dose.clear();
            info.clear();
        }

        if stats.desync_skipped > 0 {
            tracing::warn!(
                "{}: discarded {} dose rows to stay in sync with {}",
                dose_in.path().display(),
                stats.desync_skipped,
                info_in.path().display()
            );
        }

        Ok(stats)
    }
}
