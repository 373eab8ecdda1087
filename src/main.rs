use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use dca_scope::analysis::{day_of_year, monte_carlo, summary};
use dca_scope::config::{ANALYSIS, BINANCE, REPORT};
use dca_scope::data::prices::serde_version::write_price_data_async;
use dca_scope::report::{self, csv, html};
use dca_scope::{Cli, Strategy, fetch_price_data};

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    use clap::Parser;
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data Loading (Blocking)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let (series, price_signature) = rt.block_on(fetch_price_data(
        BINANCE.limits.price_acceptable_age_sec,
        &args,
    ))?;
    if series.integrity_skips() > 0 {
        log::warn!(
            "⚠️  {} sample(s) dropped for non-positive or non-finite closes",
            series.integrity_skips()
        );
    }

    // D. Cache Write (awaited: the process exits right after reporting)
    if let Err(e) = rt.block_on(write_price_data_async(
        price_signature,
        series.clone(),
        BINANCE.symbol.to_string(),
    )) {
        log::error!("⚠️  Failed to write cache: {}", e);
    }

    // E. Day-of-Year Analysis
    let yearly_budget = args.yearly_budget();
    let scan = day_of_year::scan(&series, yearly_budget)?;
    log::info!("--- Lump Sum Day-of-Year Comparison (1-365) ---");
    if let (Some(best), Some(worst)) = (scan.best(), scan.worst()) {
        log::info!("Best day of the year to invest: Day {}", best.day);
        log::info!("  -> Total Bitcoin acquired: {:.8}", best.total_acquired);
        log::info!("Worst day of the year to invest: Day {}", worst.day);
        log::info!("  -> Total Bitcoin acquired: {:.8}", worst.total_acquired);
    }

    // F. Full-Series Strategy Comparison
    let strategies = monte_carlo::trial_strategies();
    let entries = report::compare(&series, &strategies, yearly_budget)?;
    report::log_comparison(&entries);

    // G. Monte-Carlo Simulation
    let mc_config = args.monte_carlo_config();
    let results = monte_carlo::run(&series, &mc_config, &strategies, yearly_budget)?;
    log::info!(
        "--- Monte Carlo: {} trials x {} strategies over {}-year windows ---",
        mc_config.trials,
        strategies.len(),
        mc_config.window_years
    );
    for s in summary::summarize(&results, &strategies) {
        log::info!(
            "{}: median {:.8} BTC (p10 {:.8}, p90 {:.8}, mean {:.8}, n={})",
            s.strategy,
            s.median,
            s.p10,
            s.p90,
            s.mean,
            s.trials
        );
    }

    // H. Report Artifacts
    let report_dir = PathBuf::from(REPORT.directory);
    std::fs::create_dir_all(&report_dir)
        .context(format!("Failed to create report directory: {:?}", report_dir))?;

    csv::write_day_of_year_csv(&scan, &report_dir.join(REPORT.day_of_year_csv))?;
    csv::write_monte_carlo_csv(&results, &report_dir.join(REPORT.monte_carlo_csv))?;
    html::write_day_of_year_plot(&scan, &report_dir.join(REPORT.day_of_year_plot))?;
    html::write_monte_carlo_plot(
        &results,
        &strategies,
        mc_config.window_years,
        &report_dir.join(REPORT.monte_carlo_plot),
    )?;

    // Cumulative-holdings chart for the two always-on strategies
    let lump_sum = dca_scope::analysis::simulate(
        &series,
        Strategy::LumpSumOnDay(ANALYSIS.lump_sum_days.jan_1),
        yearly_budget,
    )?;
    let daily = dca_scope::analysis::simulate(&series, Strategy::DailyDca, yearly_budget)?;
    html::write_holdings_plot(
        &series,
        &[&lump_sum, &daily],
        &report_dir.join(REPORT.holdings_plot),
    )?;

    log::info!("✅ Reports written to {:?}", report_dir);
    Ok(())
}
