//! RAID-6 store workload driver
//!
//! Builds a cluster over local directories, writes a generated workload,
//! then exercises single-failure, double-failure, and update drills while
//! reporting timings and integrity results.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use raid6_store::simulation::{workload, Simulator, WorkloadGenerator};
use raid6_store::{Cluster, Config};

/// RAID-6 erasure-coded object store over simulated disks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of disks in the array
    #[arg(short = 'n', long, default_value = "8")]
    disks: usize,

    /// Directory holding the disk directories and sidecar manifests
    #[arg(long, default_value = "raid6_data")]
    base_path: PathBuf,

    /// Seed for parity placement
    #[arg(long, default_value = "0")]
    parity_seed: u64,

    /// Seed for workload generation
    #[arg(long, default_value = "0")]
    workload_seed: u64,

    /// Number of files to generate
    #[arg(long, default_value = "20")]
    files: usize,

    /// Maximum generated file size in bytes
    #[arg(long, default_value = "4096")]
    max_size: usize,

    /// Number of single-failure cases to drill
    #[arg(long, default_value = "5")]
    single_cases: usize,

    /// Number of double-failure cases to drill
    #[arg(long, default_value = "5")]
    double_cases: usize,

    /// Number of files to rewrite in the update drill
    #[arg(long, default_value = "5")]
    update_cases: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn run(args: &Args) -> raid6_store::Result<bool> {
    let config = Config::new(args.disks, &args.base_path).with_parity_seed(args.parity_seed);
    let cluster = Cluster::new(&config)?;
    let mut sim = Simulator::new(cluster);

    let mut gen = WorkloadGenerator::new(args.workload_seed);
    let files = gen.files(args.files, args.max_size);
    let singles = gen.single_failures(args.single_cases, args.disks);
    let doubles = gen.double_failures(args.double_cases, args.disks);

    workload::save_files(&args.base_path, &files)?;
    workload::save_single_failures(&args.base_path, &singles)?;
    workload::save_double_failures(&args.base_path, &doubles)?;

    let write_time = sim.populate(files)?;
    info!(
        files = args.files,
        ms = write_time.as_millis() as u64,
        "population complete"
    );

    let baseline = sim.verify_all();
    if !baseline.is_clean() {
        error!(
            mismatches = baseline.mismatches,
            read_errors = baseline.read_errors,
            "baseline verification failed"
        );
        return Ok(false);
    }

    let single = sim.run_single_drill(&singles)?;
    let double = sim.run_double_drill(&doubles)?;

    let updates = gen.updates(sim.files(), args.update_cases, args.max_size);
    let (_, update_report) = sim.run_update_drill(updates)?;

    let clean =
        single.corrupted_files == 0 && double.corrupted_files == 0 && update_report.is_clean();

    info!(
        single_avg_ms = single.average_recovery_time().as_millis() as u64,
        double_avg_ms = double.average_recovery_time().as_millis() as u64,
        clean,
        "all drills finished"
    );
    Ok(clean)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}
