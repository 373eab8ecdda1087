// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use analysis::{DayOfYearScan, MonteCarloConfig, SimulationOutcome, TrialResult};
pub use data::fetch_price_data;
pub use domain::{AnalysisError, PriceSample, PriceSeries, Strategy, Window};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use API as primary source instead of the local cache
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Number of Monte-Carlo trials (default from config)
    #[arg(long)]
    pub trials: Option<usize>,

    /// Seed for the Monte-Carlo window RNG
    #[arg(long)]
    pub seed: Option<u64>,

    /// Monte-Carlo window length in calendar years
    #[arg(long)]
    pub window_years: Option<u32>,

    /// Yearly budget in USD, shared by every strategy
    #[arg(long)]
    pub budget: Option<f64>,
}

impl Cli {
    /// Monte-Carlo knobs after applying CLI overrides to the config defaults.
    pub fn monte_carlo_config(&self) -> MonteCarloConfig {
        let defaults = MonteCarloConfig::default();
        MonteCarloConfig {
            window_years: self.window_years.unwrap_or(defaults.window_years),
            trials: self.trials.unwrap_or(defaults.trials),
            seed: self.seed.unwrap_or(defaults.seed),
        }
    }

    pub fn yearly_budget(&self) -> f64 {
        self.budget.unwrap_or(config::ANALYSIS.dca.yearly_budget)
    }
}
