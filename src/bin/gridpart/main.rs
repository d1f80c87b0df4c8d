//! `gridpart` command-line tool: generate instance files and compare the
//! partitioning heuristics on them.

mod cli;
mod logging;

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info, warn};

use gridpart::records::write_records_to_path;
use gridpart::{Algorithm, BoundingBox, Config, InstanceGenerator, InstanceGrid, PartitionSummary, Partitioner};

use crate::cli::{Cli, Command, GenerateArgs, PartitionArgs};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Gridpart(#[from] gridpart::Error),
    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error("cannot encode summaries: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "gridpart failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path).map_err(gridpart::Error::from)?,
        None => Config::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    logging::setup_logging(&config.logging, cli.json_logs)?;

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Partition(args) => partition(&args, config),
    }
}

fn generate(args: &GenerateArgs) -> Result<(), CliError> {
    let area = BoundingBox::from_coords(args.min_x, args.min_y, args.max_x, args.max_y);
    let mut generator = InstanceGenerator::new(args.seed)
        .with_max_bitsize(args.max_bitsize)
        .with_name_length(args.name_length);

    let instances = match args.clusters {
        Some(clusters) => generator.gaussian_clusters(args.count, clusters, args.sigma, &area),
        None => generator.uniform(args.count, &area),
    }
    .map_err(gridpart::Error::from)?;

    write_records_to_path(&args.out, &instances).map_err(gridpart::Error::from)?;
    info!(count = instances.len(), path = %args.out.display(), "instances written");
    Ok(())
}

fn partition(args: &PartitionArgs, mut config: Config) -> Result<(), CliError> {
    if let Some(bin_size) = args.bin_size {
        config.grid.bin_size = bin_size;
    }
    if let Some(limit) = args.limit {
        config.partition.bitsize_limit = limit;
    }
    if let Some(algorithm) = args.algorithm {
        config.partition.algorithm = algorithm;
    }
    if args.max_balance_iterations.is_some() {
        config.partition.max_balance_iterations = args.max_balance_iterations;
    }
    config.validate().map_err(gridpart::Error::from)?;

    let grid = InstanceGrid::from_path(config.grid.bin_size, &args.input)?;
    info!(
        instances = grid.len(),
        cells = grid.cell_count(),
        bin_size = config.grid.bin_size,
        "grid loaded"
    );

    let mut partitioner = Partitioner::new(&grid, config.partition.bitsize_limit);
    if let Some(max) = config.partition.max_balance_iterations {
        partitioner = partitioner.with_max_balance_iterations(max);
    }

    let algorithms = if args.all {
        Algorithm::ALL.to_vec()
    } else {
        vec![config.partition.algorithm]
    };
    let mut summaries = Vec::with_capacity(algorithms.len());
    for algorithm in algorithms {
        let started = Instant::now();
        match partitioner.run(algorithm) {
            Ok(_) => {}
            // Comparing: an infeasible algorithm should not hide the others
            Err(err) if args.all => {
                warn!(%algorithm, %err, "algorithm skipped");
                continue;
            }
            Err(err) => return Err(gridpart::Error::from(err).into()),
        }
        info!(%algorithm, elapsed = ?started.elapsed(), "algorithm finished");
        summaries.push(partitioner.summary().map_err(gridpart::Error::from)?);
    }

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &summaries)?;
        writeln!(out)?;
    } else {
        print_table(&mut out, &summaries)?;
    }
    Ok(())
}

fn print_table(out: &mut impl Write, summaries: &[PartitionSummary]) -> io::Result<()> {
    writeln!(
        out,
        "{:<10} {:>6} {:>10} {:>7} {:>10} {:>9} {:>14}  balance",
        "algorithm", "limit", "partitions", "missed", "avg bits", "violating", "routing"
    )?;
    for s in summaries {
        let balance = match s.balance {
            None => "-".to_owned(),
            Some(report) if report.is_balanced() => format!("balanced after {} moves", report.moves),
            Some(report) => format!("stalled after {} moves", report.moves),
        };
        writeln!(
            out,
            "{:<10} {:>6} {:>10} {:>7} {:>10.2} {:>9} {:>14.2}  {balance}",
            s.algorithm.as_str(),
            s.bitsize_limit,
            s.partitions,
            s.missed,
            s.average_bitsize,
            s.violating,
            s.total_routing_length,
        )?;
    }
    Ok(())
}
