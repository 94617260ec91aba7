//! List access benchmark CLI
//!
//! Run with: cargo run --release -- run --sizes 10,1000 --kinds ArrayList,LinkedList

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use list_bench::{
    fork, ConfigOverrides, ForkedExecutor, HarnessConfig, InProcessExecutor, ListKind, LookupMode,
    MatrixRunner, Operation, Report, TimeUnit, TrialExecutor,
};

#[derive(Parser)]
#[command(name = "list-bench")]
#[command(about = "Compare list access patterns across Vec, LinkedList and synchronized Vec", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure every configuration of the matrix
    Run {
        #[command(flatten)]
        axes: AxisArgs,

        #[command(flatten)]
        protocol: ProtocolArgs,

        /// Write the report as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check every configuration against the sum oracle without timing it
    Verify {
        #[command(flatten)]
        axes: AxisArgs,
    },

    /// Print the configuration matrix
    Matrix {
        #[command(flatten)]
        axes: AxisArgs,
    },

    /// Run a single trial and print its outcome as JSON
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        trial: String,
    },
}

#[derive(Args, Default)]
struct AxisArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Element counts, comma separated
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// List kinds: ArrayList, LinkedList, Vector
    #[arg(long, value_delimiter = ',')]
    kinds: Option<Vec<ListKind>>,

    /// Operations: forIndex, forEach, iterator, stream, parallelStream
    /// (case-insensitive; '-' and '_' are ignored)
    #[arg(long, value_delimiter = ',')]
    ops: Option<Vec<Operation>>,

    /// How forEach/iterator use iterated values: positional or direct
    #[arg(long)]
    lookup: Option<LookupMode>,
}

#[derive(Args, Default)]
struct ProtocolArgs {
    /// Worker processes per configuration (0 runs in-process)
    #[arg(short, long)]
    forks: Option<u32>,

    #[arg(long)]
    warmup_iterations: Option<u32>,

    #[arg(long)]
    warmup_ms: Option<u64>,

    /// Measurement iterations per fork
    #[arg(short, long)]
    iterations: Option<u32>,

    #[arg(long)]
    measurement_ms: Option<u64>,

    /// Output time unit: ns, us, ms, s
    #[arg(long)]
    unit: Option<TimeUnit>,
}

fn load_config(axes: AxisArgs, protocol: ProtocolArgs) -> Result<HarnessConfig> {
    let config = match &axes.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HarnessConfig::default(),
    };

    let overrides = ConfigOverrides {
        element_counts: axes.sizes,
        list_kinds: axes.kinds,
        operations: axes.ops,
        lookup: axes.lookup,
        forks: protocol.forks,
        warmup_iterations: protocol.warmup_iterations,
        warmup_time_ms: protocol.warmup_ms,
        measurement_iterations: protocol.iterations,
        measurement_time_ms: protocol.measurement_ms,
        time_unit: protocol.unit,
    };

    config
        .apply_overrides(overrides)
        .context("invalid benchmark configuration")
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_matrix<E: TrialExecutor>(config: &HarnessConfig, executor: E) -> Result<Report> {
    let runner = MatrixRunner::new(
        config.matrix()?,
        config.protocol.clone(),
        config.lookup,
        executor,
    )?;
    Ok(runner.run())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            axes,
            protocol,
            output,
        } => {
            init_tracing("info");
            let config = load_config(axes, protocol)?;

            let report = if config.in_process() {
                run_matrix(&config, InProcessExecutor)?
            } else {
                let executor =
                    ForkedExecutor::current_exe().context("failed to locate worker binary")?;
                run_matrix(&config, executor)?
            };

            println!("{}", report.render_table());

            if let Some(path) = output {
                let json = report.to_json()?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
                tracing::info!(path = %path.display(), "report written");
            }

            let failed = report.failures().count();
            if failed > 0 {
                bail!("{failed} of {} configurations failed", report.records().len());
            }
        }
        Commands::Verify { axes } => {
            init_tracing("info");
            let config = load_config(axes, ProtocolArgs::default())?;
            let runner = MatrixRunner::new(
                config.matrix()?,
                config.protocol.clone(),
                config.lookup,
                InProcessExecutor,
            )?;

            let failures = runner.verify();
            for (configuration, error) in &failures {
                eprintln!("{}: {}", configuration.label(), error);
            }
            if !failures.is_empty() {
                bail!("{} configurations failed verification", failures.len());
            }
            println!("{} configurations verified", runner.matrix().len());
        }
        Commands::Matrix { axes } => {
            init_tracing("warn");
            let config = load_config(axes, ProtocolArgs::default())?;
            let matrix = config.matrix()?;
            for configuration in matrix.configurations() {
                println!("{}", configuration.label());
            }
            println!("{} configurations", matrix.len());
        }
        Commands::Worker { trial } => {
            init_tracing("warn");
            let stdout = io::stdout();
            fork::run_worker(&trial, &mut stdout.lock()).context("worker trial failed")?;
        }
    }

    Ok(())
}
