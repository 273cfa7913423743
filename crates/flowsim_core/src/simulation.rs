//! Running a configured simulation
//!
//! [`run_pipeline`] streams dates through the process tree
//!
//! ```text
//! dates -> bank -> { daily, monthly }
//! ```
//!
//! while [`simulate`] drives the same bank with direct calls and collects the
//! snapshots in memory. Both produce identical output for the same config.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::bank::{Bank, BankProcess};
use crate::config::SimulationConfig;
use crate::date_generator::{DateGenerator, DateRange};
use crate::error::{ConfigError, SimulationError};
use crate::model::AccountInfo;
use crate::process::{Context, Engine, Payload, Process};
use crate::report::{ReportKind, ReportSink};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Output of a direct simulation run
#[derive(Debug)]
pub struct SimulationResult {
    pub seed: u64,
    pub daily: Vec<AccountInfo>,
    pub monthly: Vec<AccountInfo>,
    /// Final state of every account
    pub bank: Bank,
}

pub fn simulate(config: &SimulationConfig) -> Result<SimulationResult, ConfigError> {
    let mut bank = config.build_bank()?;
    let mut daily = Vec::with_capacity(config.days());
    let mut monthly = Vec::new();

    let mut ctx = Context::new();
    for date in DateRange::new(config.start_date, config.end_date) {
        bank.handle_date(date, &mut ctx);
        for msg in ctx.take_outgoing() {
            match msg.payload {
                Payload::DailyAccountInfo(info) => daily.push(info),
                Payload::MonthlyAccountInfo(info) => monthly.push(info),
                _ => {}
            }
        }
    }

    Ok(SimulationResult {
        seed: config.seed,
        daily,
        monthly,
        bank,
    })
}

/// Run the same configuration once per seed.
pub fn simulate_batch(
    config: &SimulationConfig,
    seeds: &[u64],
) -> Result<Vec<SimulationResult>, ConfigError> {
    config.validate()?;

    #[cfg(feature = "parallel")]
    let results = seeds
        .par_iter()
        .map(|&seed| simulate(&config.with_seed(seed)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = seeds
        .iter()
        .map(|&seed| simulate(&config.with_seed(seed)))
        .collect();

    results
}

/// Writers handed back by [`run_pipeline`] together with the final bank
#[derive(Debug)]
pub struct PipelineOutput<D, M> {
    pub bank: Bank,
    pub daily: D,
    pub monthly: M,
}

/// Run `config` through the process runtime, writing the daily and monthly
/// CSV reports into the given writers.
pub async fn run_pipeline<D, M>(
    config: &SimulationConfig,
    daily: D,
    monthly: M,
) -> Result<PipelineOutput<D, M>, SimulationError>
where
    D: Write + Send + 'static,
    M: Write + Send + 'static,
{
    let bank = config.build_bank()?;
    let (bank_handler, bank_rx) = BankProcess::new(bank);
    let (daily_sink, daily_rx) = ReportSink::returning(ReportKind::Daily, daily);
    let (monthly_sink, monthly_rx) = ReportSink::returning(ReportKind::Monthly, monthly);

    let tree = Process::new(
        "dates",
        DateGenerator::new(config.start_date, config.end_date),
        vec![Process::new(
            "bank",
            bank_handler,
            vec![
                Process::new("daily", daily_sink, Vec::new()),
                Process::new("monthly", monthly_sink, Vec::new()),
            ],
        )],
    );

    info!(
        start = %config.start_date,
        end = %config.end_date,
        seed = config.seed,
        accounts = config.accounts.len(),
        line_items = config.line_items.len(),
        "simulation started"
    );
    Engine::new(vec![tree]).start().await.wait().await;

    let bank = bank_rx.await.map_err(|_| SimulationError::BankUnavailable)?;
    let daily = daily_rx
        .await
        .map_err(|_| SimulationError::ReportUnavailable(ReportKind::Daily.file_name()))?;
    let monthly = monthly_rx
        .await
        .map_err(|_| SimulationError::ReportUnavailable(ReportKind::Monthly.file_name()))?;
    info!("simulation finished");

    Ok(PipelineOutput {
        bank,
        daily,
        monthly,
    })
}

/// Run the pipeline into `daily.csv` and `monthly.csv` under `out_dir`,
/// truncating any existing reports.
pub async fn write_csv_reports(
    config: &SimulationConfig,
    out_dir: &Path,
) -> Result<Bank, SimulationError> {
    std::fs::create_dir_all(out_dir)?;
    let daily = File::create(out_dir.join(ReportKind::Daily.file_name()))?;
    let monthly = File::create(out_dir.join(ReportKind::Monthly.file_name()))?;
    let output = run_pipeline(config, daily, monthly).await?;
    Ok(output.bank)
}
