//! Flat CSV exports so the artifacts stay inspectable without a browser.

use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::analysis::day_of_year::DayOfYearScan;
use crate::analysis::monte_carlo::TrialResult;

pub(crate) fn day_of_year_csv(scan: &DayOfYearScan) -> String {
    let rows = scan
        .points
        .iter()
        .map(|p| format!("{},{:.8}", p.day, p.total_acquired))
        .join("\n");
    format!("day,total_acquired\n{}\n", rows)
}

pub fn write_day_of_year_csv(scan: &DayOfYearScan, path: &Path) -> Result<()> {
    std::fs::write(path, day_of_year_csv(scan))
        .context(format!("Failed to write CSV: {}", path.display()))
}

pub(crate) fn monte_carlo_csv(results: &[TrialResult]) -> String {
    let rows = results
        .iter()
        .map(|r| format!("{},{},{:.8}", r.trial, r.strategy, r.total_acquired))
        .join("\n");
    format!("trial,strategy,total_acquired\n{}\n", rows)
}

pub fn write_monte_carlo_csv(results: &[TrialResult], path: &Path) -> Result<()> {
    std::fs::write(path, monte_carlo_csv(results))
        .context(format!("Failed to write CSV: {}", path.display()))
}
