//! Plotly HTML artifacts. Thin wrappers: all numbers are computed upstream,
//! this module only embeds them as JSON in a static page shell.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::analysis::day_of_year::DayOfYearScan;
use crate::analysis::monte_carlo::TrialResult;
use crate::analysis::simulator::SimulationOutcome;
use crate::domain::{PriceSeries, Strategy};
use crate::utils::TimeUtils;

fn plotly_page(traces: &Value, layout: &Value) -> Result<String> {
    let traces_json = serde_json::to_string(traces)?;
    let layout_json = serde_json::to_string(layout)?;
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
         <script src=\"https://cdn.plot.ly/plotly-2.35.2.min.js\"></script>\n\
         </head>\n<body>\n<div id=\"chart\"></div>\n<script>\n\
         Plotly.newPlot(\"chart\", {traces_json}, {layout_json});\n\
         </script>\n</body>\n</html>\n"
    ))
}

fn write_page(path: &Path, traces: &Value, layout: &Value) -> Result<()> {
    let page = plotly_page(traces, layout)?;
    std::fs::write(path, page).context(format!("Failed to write plot: {}", path.display()))
}

pub(crate) fn day_of_year_traces(scan: &DayOfYearScan) -> Value {
    let days: Vec<u16> = scan.points.iter().map(|p| p.day).collect();
    let totals: Vec<f64> = scan.points.iter().map(|p| p.total_acquired).collect();
    json!([{ "x": days, "y": totals, "mode": "lines", "name": "Total BTC" }])
}

/// Line chart of total BTC vs lump-sum day of year.
pub fn write_day_of_year_plot(scan: &DayOfYearScan, path: &Path) -> Result<()> {
    let layout = json!({
        "title": "Total Bitcoin vs. Day of the Year for Lump Sum Investment",
        "xaxis": { "title": "Day of the Year" },
        "yaxis": { "title": "Total Bitcoin Acquired" },
    });
    write_page(path, &day_of_year_traces(scan), &layout)
}

pub(crate) fn monte_carlo_traces(results: &[TrialResult], strategies: &[Strategy]) -> Value {
    let traces: Vec<Value> = strategies
        .iter()
        .map(|&strategy| {
            let totals: Vec<f64> = results
                .iter()
                .filter(|r| r.strategy == strategy)
                .map(|r| r.total_acquired)
                .collect();
            json!({ "y": totals, "type": "box", "name": strategy.to_string() })
        })
        .collect();
    Value::Array(traces)
}

/// One box trace per strategy over the Monte-Carlo trials.
pub fn write_monte_carlo_plot(
    results: &[TrialResult],
    strategies: &[Strategy],
    window_years: u32,
    path: &Path,
) -> Result<()> {
    let layout = json!({
        "title": format!(
            "Monte Carlo Simulation of Bitcoin Investment Strategies ({}-Year Windows)",
            window_years
        ),
        "yaxis": { "title": "Total Bitcoin Acquired" },
        "showlegend": false,
    });
    write_page(path, &monte_carlo_traces(results, strategies), &layout)
}

fn cumulative_trace(outcome: &SimulationOutcome) -> Value {
    let mut dates = Vec::with_capacity(outcome.purchases.len());
    let mut running = Vec::with_capacity(outcome.purchases.len());
    let mut total = 0.0;
    for purchase in &outcome.purchases {
        total += purchase.acquired;
        dates.push(purchase.date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string());
        running.push(total);
    }
    json!({
        "x": dates,
        "y": running,
        "mode": "lines",
        "name": outcome.strategy.to_string(),
        "yaxis": "y2",
    })
}

/// Price series plus cumulative holdings per strategy on a secondary axis.
pub fn write_holdings_plot(
    series: &PriceSeries,
    outcomes: &[&SimulationOutcome],
    path: &Path,
) -> Result<()> {
    let dates: Vec<String> = series
        .samples()
        .iter()
        .map(|s| s.date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string())
        .collect();
    let closes: Vec<f64> = series.samples().iter().map(|s| s.close).collect();

    let mut traces = vec![json!({
        "x": dates, "y": closes, "mode": "lines", "name": "Bitcoin Price",
    })];
    traces.extend(outcomes.iter().map(|o| cumulative_trace(o)));

    let layout = json!({
        "title": "Bitcoin Investment Strategies",
        "xaxis": { "title": "Date" },
        "yaxis": { "title": "Price (USD)" },
        "yaxis2": { "title": "Cumulative BTC", "overlaying": "y", "side": "right" },
    });
    write_page(path, &Value::Array(traces), &layout)
}
