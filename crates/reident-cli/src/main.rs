//! reident - Monte Carlo re-identification risk from the command line
//!
//! Usage:
//!   reident sweep-n --data users.csv --n-max 20           # accuracy vs pool size
//!   reident sweep-split --data users.csv --scope train    # accuracy vs split fraction
//!   reident estimate --data users.csv --n 5               # one estimate per classifier
//!   reident sweep-n --data users.csv --output results/    # also write accuracy.csv + params.json

use clap::{Parser, Subcommand};
use reident::dataset::SplitScope;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod data;
mod error;
mod output;

use output::OutputFormat;

/// reident - estimate how often a user can be singled out among N candidates
#[derive(Parser)]
#[command(name = "reident")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Seed of the shared random generator (overrides the params file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format on stdout
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Directory for accuracy.csv and params.json
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the candidate pool size from 1 to N_max
    SweepN {
        /// Dataset CSV: user column, then feature columns
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Simulation parameters as JSON
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Largest pool size
        #[arg(long)]
        n_max: Option<usize>,

        /// Trials per estimate
        #[arg(long)]
        iters: Option<usize>,
    },

    /// Sweep the holdout split fraction at a fixed pool size
    SweepSplit {
        /// Dataset CSV: user column, then feature columns
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Simulation parameters as JSON
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Pool size
        #[arg(long)]
        n: Option<usize>,

        /// Which fraction to sweep
        #[arg(long, value_parser = parse_scope)]
        scope: Option<SplitScope>,

        /// Trials per estimate
        #[arg(long)]
        iters: Option<usize>,
    },

    /// Estimate accuracy at one pool size for every classifier
    Estimate {
        /// Dataset CSV: user column, then feature columns
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Pool size
        #[arg(long)]
        n: usize,

        /// Simulation parameters as JSON
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Trials per estimate
        #[arg(long)]
        iters: Option<usize>,
    },
}

fn parse_scope(s: &str) -> Result<SplitScope, String> {
    match s {
        "train" => Ok(SplitScope::Train),
        "test" => Ok(SplitScope::Test),
        other => Err(format!("unknown scope '{other}', expected train or test")),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let seed = cli.seed;
    let output = cli.output.as_deref();

    let result = match cli.command {
        Commands::SweepN {
            data,
            params,
            n_max,
            iters,
        } => commands::effective_params(params.as_deref(), |p| {
            p.rng_seed = seed.unwrap_or(p.rng_seed);
            p.n_max = n_max.unwrap_or(p.n_max);
            p.n_iters = iters.unwrap_or(p.n_iters);
        })
        .and_then(|p| commands::sweep::run_pool_size(&data, &p, cli.format, output)),

        Commands::SweepSplit {
            data,
            params,
            n,
            scope,
            iters,
        } => commands::effective_params(params.as_deref(), |p| {
            p.rng_seed = seed.unwrap_or(p.rng_seed);
            p.n_candidates = n.unwrap_or(p.n_candidates);
            p.split.scope = scope.unwrap_or(p.split.scope);
            p.n_iters = iters.unwrap_or(p.n_iters);
        })
        .and_then(|p| commands::sweep::run_split(&data, &p, cli.format, output)),

        Commands::Estimate {
            data,
            n,
            params,
            iters,
        } => commands::effective_params(params.as_deref(), |p| {
            p.rng_seed = seed.unwrap_or(p.rng_seed);
            p.n_candidates = n;
            p.n_iters = iters.unwrap_or(p.n_iters);
        })
        .and_then(|p| commands::estimate::run(&data, &p, cli.format, output)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
