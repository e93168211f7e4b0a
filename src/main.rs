//! filter-mis-output: filter imputation dosage/info files to an inclusion list
//!
//! Usage: filter-mis-output [OPTIONS]

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filter_mis_output::commands::{BatchCommand, FailurePolicy, FilterImputedCommand};
use filter_mis_output::config::{self, DEFAULT_PROGRESS_INTERVAL};
use filter_mis_output::{ChromosomeSelector, FilterError, InclusionIndex, Result};

#[derive(Parser)]
#[command(name = "filter-mis-output")]
#[command(version)]
#[command(
    about = "Filter imputation server dosage and info files down to a list of variants",
    long_about = None
)]
struct Cli {
    /// Directory containing imputation output files
    #[arg(long, default_value = ".")]
    input_data_directory: PathBuf,

    /// Directory to which to write results
    #[arg(long, default_value = ".")]
    output_data_directory: PathBuf,

    /// Individual chromosome to process
    #[arg(long)]
    chromosome: Option<u32>,

    /// Lowest (number) chromosome to process
    #[arg(long)]
    chromosome_lower_bound: Option<u32>,

    /// Highest (number) chromosome to process
    #[arg(long)]
    chromosome_upper_bound: Option<u32>,

    /// Arbitrary list of chromosomes to process
    #[arg(long, num_args = 1..)]
    chromosome_list: Vec<u32>,

    /// File containing variants to keep (first column)
    #[arg(long)]
    inclusion_file: Option<PathBuf>,

    /// Allow dose and info line mismatches by discarding dose lines until
    /// the files line up again (don't use this unless you know why)
    #[arg(long)]
    permit_file_desync: bool,

    /// Number of chromosomes to process in parallel (default: 1)
    #[arg(long, short = 't')]
    threads: Option<usize>,

    /// Keep processing remaining chromosomes after one fails
    #[arg(long)]
    continue_on_error: bool,

    /// Compared rows between progress messages (0 disables them)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn selector(&self) -> ChromosomeSelector {
        ChromosomeSelector::new()
            .with_chromosome(self.chromosome.unwrap_or(0))
            .with_bounds(
                self.chromosome_lower_bound.unwrap_or(0),
                self.chromosome_upper_bound.unwrap_or(0),
            )
            .with_list(self.chromosome_list.clone())
    }
}

fn main() {
    // Running with no arguments at all is a request for help
    if std::env::args_os().len() == 1 {
        let _ = Cli::command().print_help();
        println!();
        process::exit(0);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => FilterError::Validation(e.to_string()).exit_code(),
            };
            process::exit(code);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match std::panic::catch_unwind(|| run(cli)) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
        Err(_) => {
            eprintln!("error: unhandled exception");
            2
        }
    };
    process::exit(code);
}

/// Returns the process exit code once the batch has run. Setup errors are
/// returned as `Err`; chromosome failures are logged by the driver.
fn run(cli: Cli) -> Result<i32> {
    let threads = cli.threads.unwrap_or(1);
    if threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| FilterError::Configuration(format!("thread pool: {}", e)))?;
    }
    config::set_progress_interval(cli.progress_interval);

    let inclusion_file = cli.inclusion_file.clone().ok_or_else(|| {
        FilterError::Configuration("requested parameter \"inclusion-file\" unset".to_string())
    })?;

    tracing::info!("reconciling requested chromosomes");
    let chromosomes = cli.selector().resolve();
    if chromosomes.is_empty() {
        tracing::warn!("no chromosomes selected, nothing to do");
    }

    tracing::info!(
        "reading variant inclusion data from file \"{}\"",
        inclusion_file.display()
    );
    let index = InclusionIndex::from_file(&inclusion_file)?;
    if index.is_empty() {
        tracing::warn!("inclusion list is empty, every variant will be removed");
    } else {
        tracing::info!("loaded {} variants to keep", index.len());
    }

    let policy = if cli.continue_on_error {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };
    let batch = BatchCommand::new(&cli.input_data_directory, &cli.output_data_directory)
        .with_filter(FilterImputedCommand::new().with_permit_file_desync(cli.permit_file_desync))
        .with_policy(policy)
        .with_parallel(threads > 1);

    let summary = batch.run(&chromosomes, &index);
    tracing::info!(
        "{} of {} chromosomes filtered: {}",
        summary.succeeded(),
        summary.outcomes.len(),
        summary.totals()
    );

    let code = summary.exit_code();
    if code == 0 {
        tracing::info!("all done");
    }
    Ok(code)
}
