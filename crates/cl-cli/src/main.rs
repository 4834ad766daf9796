//! Chain Lightning command line
//!
//! Usage:
//!   chain-lightning spin [--config PATH] [--seed N]       - Play one spin, print JSON
//!   chain-lightning simulate [--rounds N] [--log N] ...   - Batch RTP simulation
//!   chain-lightning seeds [--count N] [--target RTP] ...  - Balanced seed list (JSON)
//!   chain-lightning config [--config PATH]                - Print the parameter summary
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=info`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cl_engine::{ParameterSet, SpinEngine};
use cl_sim::{
    DEFAULT_TARGET_RTP, PROGRESS_FILE, ProgressLog, SeedBalanceConfig, SeedBalancer, SimConfig,
    SimReport, Simulator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(name = "chain-lightning", about = "Chain Lightning spin engine and simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single spin and print it as JSON
    Spin {
        /// Parameter file (JSON); defaults to the standard set
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seed for a reproducible spin
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run a batch simulation and report RTP
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of spins
        #[arg(short, long, default_value_t = 10_000_000)]
        rounds: u64,
        /// Write a progress line every N spins (single stream)
        #[arg(short, long)]
        log: Option<u64>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Parallel shards; defaults to the CPU count
        #[arg(long)]
        shards: Option<usize>,
        /// Directory for the report and progress files
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Collect seeds whose wins balance to a target RTP
    Seeds {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of seeds to keep
        #[arg(short = 'n', long, default_value_t = 10_000)]
        count: usize,
        /// Target RTP in percent
        #[arg(short, long, default_value_t = DEFAULT_TARGET_RTP)]
        target: f64,
        /// Largest share of the list one win value may take
        #[arg(long, default_value_t = 0.01)]
        max_share: f64,
        /// First seed to try; defaults to the current unix time
        #[arg(short, long)]
        base_seed: Option<u64>,
        /// Output JSON file
        #[arg(short, long, default_value = "cl-seeds-balanced.json")]
        out: PathBuf,
    },
    /// Print the effective parameter summary
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin { config, seed } => spin(config.as_deref(), seed),
        Commands::Simulate {
            config,
            rounds,
            log,
            seed,
            shards,
            out,
        } => simulate(config.as_deref(), rounds, log, seed, shards, out),
        Commands::Seeds {
            config,
            count,
            target,
            max_share,
            base_seed,
            out,
        } => balance_seeds(config.as_deref(), count, target, max_share, base_seed, &out),
        Commands::Config { config } => show_config(config.as_deref()),
    }
}

fn load_params(path: Option<&Path>) -> Result<ParameterSet> {
    match path {
        Some(path) => ParameterSet::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            log::info!("No config given, using the standard parameter set");
            Ok(ParameterSet::standard())
        }
    }
}

fn spin(config: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let params = load_params(config)?;
    let engine = SpinEngine::new(params).context("Invalid parameter set")?;

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let result = engine.spin(&mut rng);

    println!("{}", serde_json::to_string_pretty(&result.view(engine.params()))?);
    Ok(())
}

fn simulate(
    config: Option<&Path>,
    rounds: u64,
    log_interval: Option<u64>,
    seed: Option<u64>,
    shards: Option<usize>,
    out: Option<PathBuf>,
) -> Result<()> {
    let params = load_params(config)?;
    let sim = Simulator::new(params.clone()).context("Invalid parameter set")?;

    let mut sim_config = SimConfig::default().with_spins(rounds);
    if let Some(seed) = seed {
        sim_config = sim_config.with_seed(seed);
    }
    if let Some(shards) = shards {
        sim_config = sim_config.with_shards(shards);
    }
    if let Some(dir) = &out {
        sim_config = sim_config.with_output_dir(dir);
    }

    let run = match log_interval {
        Some(interval) => {
            sim_config = sim_config.with_log_interval(interval);
            let dir = out.clone().unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let log_path = dir.join(PROGRESS_FILE);

            let mut progress = ProgressLog::create(&log_path)
                .with_context(|| format!("Failed to create {}", log_path.display()))?;
            let run = sim.run_with_progress(&sim_config, |point| {
                eprintln!(
                    "round {:>12}  RTP {:>8.4}%  hit {:>8.4}%",
                    point.round, point.rtp, point.hit_rate
                );
                progress.append(point)
            })?;
            progress.finish()?;
            log::info!("Progress log written to {}", log_path.display());
            run
        }
        None => sim.run(&sim_config)?,
    };

    let report = SimReport::new(&params, &run);
    println!("{}", report.to_text());

    if let Some(dir) = &sim_config.output_dir {
        report
            .write_to(dir)
            .with_context(|| format!("Failed to write report to {}", dir.display()))?;
    }
    Ok(())
}

fn balance_seeds(
    config: Option<&Path>,
    count: usize,
    target: f64,
    max_share: f64,
    base_seed: Option<u64>,
    out: &Path,
) -> Result<()> {
    let params = load_params(config)?;
    let balancer = SeedBalancer::new(params).context("Invalid parameter set")?;

    let mut balance = SeedBalanceConfig::default()
        .with_count(count)
        .with_target_rtp(target)
        .with_max_win_share(max_share);
    if let Some(seed) = base_seed {
        balance = balance.with_base_seed(seed);
    }

    let set = balancer.run(&balance)?;
    set.write_to(out)
        .with_context(|| format!("Failed to write seeds to {}", out.display()))?;

    println!("Seeds tested: {}", set.candidates);
    println!("Final RTP: {:.2}%", set.rtp());
    println!("Saved {} seeds to {}", set.seeds.len(), out.display());
    Ok(())
}

fn show_config(config: Option<&Path>) -> Result<()> {
    let params = load_params(config)?;
    params.validate().context("Invalid parameter set")?;
    println!("{}", serde_json::to_string_pretty(&params.summary())?);
    Ok(())
}
