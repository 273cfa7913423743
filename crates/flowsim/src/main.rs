mod logging;
mod scenario;

use std::path::PathBuf;

use clap::Parser;
use flowsim_core::simulation::{simulate_batch, write_csv_reports};

use crate::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "flowsim")]
#[command(about = "A deterministic personal cashflow simulator")]
struct Args {
    /// Path to a JSON scenario (default: built-in household)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Directory for daily.csv and monthly.csv
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Seed for every random draw (overrides the scenario's seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many seeds in memory and print a summary instead of writing reports
    #[arg(long)]
    batch: Option<usize>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.scenario {
        Some(path) => scenario::load(path)?,
        None => scenario::household()?,
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    if let Some(runs) = args.batch {
        let seeds: Vec<u64> = (0..runs as u64).map(|i| config.seed + i).collect();
        tracing::info!(runs, "running batch");
        for result in simulate_batch(&config, &seeds)? {
            println!("seed {}", result.seed);
            for account in result.bank.accounts() {
                println!("  {:>20}\t{}", account.name(), account.current_balance());
            }
        }
        return Ok(());
    }

    let bank = write_csv_reports(&config, &args.out_dir).await?;
    tracing::info!(out_dir = %args.out_dir.display(), "reports written");

    println!();
    print!("{bank}");
    println!("\nExiting...");

    Ok(())
}
