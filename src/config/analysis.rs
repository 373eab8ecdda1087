//! Analysis and simulation configuration

/// Settings for the periodic-purchase strategies
pub struct DcaSettings {
    /// Yearly budget in quote currency (USD), shared by every strategy
    pub yearly_budget: f64,
}

/// Settings for the Monte-Carlo window sampler
pub struct MonteCarloSettings {
    /// Length of each sampled window, in calendar years
    pub window_years: u32,
    /// Number of windows drawn (with replacement)
    pub trials: usize,
    /// Seed for the window RNG so runs are reproducible
    pub seed: u64,
}

/// The two fixed lump-sum dates the comparison reports track
pub struct LumpSumDays {
    pub jan_1: u16,
    // Day 152 of a non-leap year = June 1. Fixed mapping, never recomputed.
    pub june_1: u16,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub dca: DcaSettings,
    pub monte_carlo: MonteCarloSettings,
    pub lump_sum_days: LumpSumDays,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    dca: DcaSettings {
        yearly_budget: 1000.0,
    },
    monte_carlo: MonteCarloSettings {
        window_years: 5,
        trials: 1000,
        seed: 42,
    },
    lump_sum_days: LumpSumDays {
        jan_1: 1,
        june_1: 152,
    },
};
