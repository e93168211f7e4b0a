//! End-to-end filtering over gzip-compressed dosage/info pairs.
//!
//! These tests use the standard imputation server file names so the whole
//! path from chromosome selection to compressed output is exercised.

use filter_mis_output::prelude::*;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::tempdir;

const DOSE_META: &str = "##fileformat=VCFv4.1\n##filedate=2019.6.4\n##source=Minimac4.v1.0.0\n";
const DOSE_COLUMNS: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2";
const INFO_HEADER: &str = "SNP\tREF(0)\tALT(1)\tALT_Frq\tMAF\tAvgCall\tRsq\tGenotyped";

fn dose_row(chrom: u32, pos: u32, id: &str) -> String {
    format!(
        "{}\t{}\t{}\tA\tG\t.\tPASS\tAF=0.1;MAF=0.1;R2=0.9\tDS\t0.102\t1.000",
        chrom, pos, id
    )
}

fn info_row(id: &str) -> String {
    format!("{}\tA\tG\t0.1\t0.1\t0.99\t0.9\tImputed", id)
}

fn write_gz(path: &Path, text: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(text.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn read_gz(path: &Path) -> String {
    let mut text = String::new();
    MultiGzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text
}

/// Write `chr{chrom}.dose.vcf.gz` and `chr{chrom}.info.gz` with the given ids.
fn write_chromosome(dir: &Path, chrom: u32, dose_ids: &[&str], info_ids: &[&str]) {
    let mut dose = format!("{}{}\n", DOSE_META, DOSE_COLUMNS);
    for (i, id) in dose_ids.iter().enumerate() {
        dose.push_str(&dose_row(chrom, 1000 + i as u32, id));
        dose.push('\n');
    }
    let mut info = format!("{}\n", INFO_HEADER);
    for id in info_ids {
        info.push_str(&info_row(id));
        info.push('\n');
    }
    write_gz(&dir.join(format!("chr{}.dose.vcf.gz", chrom)), &dose);
    write_gz(&dir.join(format!("chr{}.info.gz", chrom)), &info);
}

fn data_rows(text: &str, header_lines: usize) -> Vec<&str> {
    text.lines().skip(header_lines).collect()
}

#[test]
fn test_inclusion_scenario() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_chromosome(input.path(), 22, &["rs1", "rs2", "rs3"], &["rs1", "rs2", "rs3"]);
    let keep = input.path().join("keep.txt");
    std::fs::write(&keep, "rs1\nrs3\n").unwrap();

    let index = InclusionIndex::from_file(&keep).unwrap();
    let files = ChromosomeFiles::new(input.path(), output.path(), 22);
    let stats = FilterImputedCommand::new()
        .run_chromosome(&files, &index)
        .unwrap();

    assert_eq!(stats.compared, 3);
    assert_eq!(stats.retained, 2);
    assert_eq!(stats.dropped, 1);

    let dose = read_gz(&files.dosage_output);
    assert!(dose.starts_with(&format!("{}{}\n", DOSE_META, DOSE_COLUMNS)));
    assert_eq!(
        data_rows(&dose, 4),
        vec![dose_row(22, 1000, "rs1"), dose_row(22, 1002, "rs3")]
    );

    let info = read_gz(&files.info_output);
    assert_eq!(info.lines().next(), Some(INFO_HEADER));
    assert_eq!(data_rows(&info, 1), vec![info_row("rs1"), info_row("rs3")]);
}

#[test]
fn test_full_inclusion_reproduces_inputs() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let ids = ["rs10", "rs11", "rs12", "rs13"];
    write_chromosome(input.path(), 1, &ids, &ids);
    let index: InclusionIndex = ids.into_iter().collect();

    let files = ChromosomeFiles::new(input.path(), output.path(), 1);
    FilterImputedCommand::new()
        .run_chromosome(&files, &index)
        .unwrap();

    assert_eq!(read_gz(&files.dosage_output), read_gz(&files.dosage_input));
    assert_eq!(read_gz(&files.info_output), read_gz(&files.info_input));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let input = tempdir().unwrap();
    let out_a = tempdir().unwrap();
    let out_b = tempdir().unwrap();
    write_chromosome(input.path(), 5, &["rs1", "rs2", "rs3"], &["rs1", "rs2", "rs3"]);
    let index: InclusionIndex = ["rs2", "rs3"].into_iter().collect();
    let cmd = FilterImputedCommand::new();

    let a = ChromosomeFiles::new(input.path(), out_a.path(), 5);
    let b = ChromosomeFiles::new(input.path(), out_b.path(), 5);
    cmd.run_chromosome(&a, &index).unwrap();
    cmd.run_chromosome(&b, &index).unwrap();

    assert_eq!(
        std::fs::read(&a.dosage_output).unwrap(),
        std::fs::read(&b.dosage_output).unwrap()
    );
    assert_eq!(
        std::fs::read(&a.info_output).unwrap(),
        std::fs::read(&b.info_output).unwrap()
    );
}

#[test]
fn test_tolerant_desync_over_gzip() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_chromosome(input.path(), 9, &["A", "B", "C"], &["B", "C"]);
    let index: InclusionIndex = ["B", "C"].into_iter().collect();

    let files = ChromosomeFiles::new(input.path(), output.path(), 9);
    let stats = FilterImputedCommand::new()
        .with_permit_file_desync(true)
        .run_chromosome(&files, &index)
        .unwrap();

    assert_eq!((stats.compared, stats.retained, stats.dropped), (2, 2, 0));
    assert_eq!(
        data_rows(&read_gz(&files.dosage_output), 4),
        vec![dose_row(9, 1001, "B"), dose_row(9, 1002, "C")]
    );
    assert_eq!(
        data_rows(&read_gz(&files.info_output), 1),
        vec![info_row("B"), info_row("C")]
    );
}

#[test]
fn test_intolerant_desync_publishes_nothing() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_chromosome(input.path(), 9, &["A", "B"], &["A", "C"]);
    let index: InclusionIndex = ["A", "B", "C"].into_iter().collect();

    let files = ChromosomeFiles::new(input.path(), output.path(), 9);
    let err = FilterImputedCommand::new()
        .run_chromosome(&files, &index)
        .unwrap_err();

    assert!(err.is_format_error());
    assert!(matches!(err, FilterError::Desync { compared: 1, .. }));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_uncompressed_inputs_are_found() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(
        input.path().join("chr4.dose.vcf"),
        format!("{}\n{}\n", DOSE_COLUMNS, dose_row(4, 1, "rs4")),
    )
    .unwrap();
    std::fs::write(
        input.path().join("chr4.info"),
        format!("{}\n{}\n", INFO_HEADER, info_row("rs4")),
    )
    .unwrap();
    let index: InclusionIndex = ["rs4"].into_iter().collect();

    let files = ChromosomeFiles::new(input.path(), output.path(), 4);
    let stats = FilterImputedCommand::new()
        .run_chromosome(&files, &index)
        .unwrap();

    assert_eq!(stats.retained, 1);
    assert_eq!(
        data_rows(&read_gz(&files.dosage_output), 1),
        vec![dose_row(4, 1, "rs4")]
    );
}

#[test]
fn test_batch_over_selected_range() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    for chrom in 20..=22 {
        write_chromosome(input.path(), chrom, &["x", "y"], &["x", "y"]);
    }
    let index: InclusionIndex = ["y"].into_iter().collect();
    let chromosomes = ChromosomeSelector::new()
        .with_bounds(20, 0)
        .with_list(vec![23])
        .resolve();

    let summary = BatchCommand::new(input.path(), output.path()).run(&chromosomes, &index);

    assert_eq!(summary.succeeded(), 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.totals().retained, 3);
    assert!(!output.path().join("chr23-filtered.info.gz").exists());
}
