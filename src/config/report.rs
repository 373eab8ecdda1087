//! Output artifact configuration

pub struct ReportConfig {
    /// Directory all report artifacts are written to
    pub directory: &'static str,
    pub day_of_year_plot: &'static str,
    pub monte_carlo_plot: &'static str,
    pub holdings_plot: &'static str,
    pub day_of_year_csv: &'static str,
    pub monte_carlo_csv: &'static str,
}

pub const REPORT: ReportConfig = ReportConfig {
    directory: "reports",
    day_of_year_plot: "day_of_year_plot.html",
    monte_carlo_plot: "monte_carlo_simulation_plot.html",
    holdings_plot: "btc_investment_plot.html",
    day_of_year_csv: "day_of_year.csv",
    monte_carlo_csv: "monte_carlo.csv",
};
