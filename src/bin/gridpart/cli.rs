//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gridpart::Algorithm;

/// Spatial partitioning of weighted 2D instances.
#[derive(Debug, Parser)]
#[command(name = "gridpart", version, about)]
pub(crate) struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Log filter, overrides the config file (e.g. `debug`, `gridpart=trace`)
    #[arg(short, long, global = true, value_name = "LEVEL")]
    pub(crate) log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub(crate) json_logs: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Write a seeded random instance file
    Generate(GenerateArgs),
    /// Partition an instance file and print quality metrics
    Partition(PartitionArgs),
}

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    /// Output record file
    #[arg(short, long, value_name = "FILE")]
    pub(crate) out: PathBuf,

    /// Number of instances
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub(crate) count: usize,

    /// Gaussian cluster count; uniform placement when omitted
    #[arg(long)]
    pub(crate) clusters: Option<usize>,

    /// Standard deviation of cluster offsets
    #[arg(long, default_value_t = 10.0)]
    pub(crate) sigma: f64,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    pub(crate) seed: u64,

    /// Largest instance bitsize
    #[arg(long, default_value_t = 8)]
    pub(crate) max_bitsize: u32,

    /// Length of generated names
    #[arg(long, default_value_t = 8)]
    pub(crate) name_length: usize,

    /// Lower x bound of the area
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub(crate) min_x: f64,
    /// Lower y bound of the area
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub(crate) min_y: f64,
    /// Upper x bound of the area
    #[arg(long, default_value_t = 1000.0, allow_negative_numbers = true)]
    pub(crate) max_x: f64,
    /// Upper y bound of the area
    #[arg(long, default_value_t = 1000.0, allow_negative_numbers = true)]
    pub(crate) max_y: f64,
}

#[derive(Debug, Args)]
pub(crate) struct PartitionArgs {
    /// Input record file (`name x y bitsize` per line)
    #[arg(short, long, value_name = "FILE")]
    pub(crate) input: PathBuf,

    /// Algorithm to run, overrides the config file
    #[arg(short, long, conflicts_with = "all")]
    pub(crate) algorithm: Option<Algorithm>,

    /// Run every algorithm and compare
    #[arg(long)]
    pub(crate) all: bool,

    /// Capacity limit per partition
    #[arg(long)]
    pub(crate) limit: Option<u32>,

    /// Grid cell side
    #[arg(long)]
    pub(crate) bin_size: Option<f64>,

    /// Cap on balancing iterations (merging only)
    #[arg(long)]
    pub(crate) max_balance_iterations: Option<usize>,

    /// Print summaries as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_partition_args() {
        let cli = Cli::try_parse_from([
            "gridpart", "--log-level", "debug", "partition", "-i", "in.txt", "-a", "naive", "--limit", "64",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Partition(args) = cli.command else {
            panic!("expected the partition subcommand");
        };
        assert_eq!(args.algorithm, Some(Algorithm::Hashmap));
        assert_eq!(args.limit, Some(64));
        assert!(!args.all);
    }

    #[test]
    fn test_all_conflicts_with_algorithm() {
        let parsed = Cli::try_parse_from(["gridpart", "partition", "-i", "in.txt", "-a", "nearby", "--all"]);
        assert!(parsed.is_err(), "--all and --algorithm are exclusive");
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["gridpart", "generate", "-o", "out.txt", "--min-x", "-50"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected the generate subcommand");
        };
        assert_eq!(args.count, 10_000);
        assert_eq!(args.clusters, None);
        assert_eq!(args.min_x, -50.0);
        assert_eq!(args.max_x, 1000.0);
    }
}
