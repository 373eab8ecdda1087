// Std library crates
use std::collections::HashSet;
use std::time::SystemTime;

// External crates
use anyhow::{Result, bail};
use async_trait::async_trait;
use binance_sdk::common::models::Interval as binance_interval;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::models::RestApiRateLimit;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};
use thiserror::Error;
use tokio::time::{Duration, Instant, sleep};

// Local crates
use crate::config::BINANCE;
use crate::config::binance::BinanceApiConfig;
use crate::data::prices::CreatePriceSeriesData;
use crate::domain::{PriceSample, PriceSeries};
use crate::utils::TimeUtils;
use crate::utils::time_utils;

/// Daily-close provider backed by the Binance spot REST API.
pub struct BNAPIVersion;

#[async_trait]
impl CreatePriceSeriesData for BNAPIVersion {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn create_price_series(&self) -> Result<PriceSeries> {
        let start_time = Instant::now();
        let klines = load_daily_klines(BINANCE.symbol).await?;

        let samples: Vec<PriceSample> = klines
            .into_iter()
            .filter_map(|kline| {
                let date = time_utils::epoch_ms_to_naive_date(kline.open_timestamp_ms)?;
                // A missing close funnels into the series integrity counter
                // instead of being dropped silently here
                let close = kline.close_price.unwrap_or(f64::NAN);
                Some(PriceSample { date, close })
            })
            .collect();

        let series = PriceSeries::from_samples(samples)?;
        if series.integrity_skips() > 0 {
            log::warn!(
                "⚠️  {} kline(s) from Binance had unusable closes and were skipped",
                series.integrity_skips()
            );
        }

        log::info!(
            "Fetched {} daily closes for {} ({} -> {}) in {:?}",
            series.len(),
            BINANCE.symbol,
            series.first_date(),
            series.last_date(),
            start_time.elapsed()
        );
        Ok(series)
    }
}

#[derive(Debug, PartialEq)]
pub struct BNKline {
    pub open_timestamp_ms: i64, // only necessary field, close can be absent
    pub close_price: Option<f64>,
}

#[derive(Debug, Error)]
pub enum BNKlineError {
    #[error("Invalid length")]
    InvalidLength,
    #[error("Invalid type: {0}")]
    InvalidType(String),
    #[error("Binance API connection failed: {0}.")]
    ConnectionFailed(String),
}

// Extracts a float from the heterogeneous kline cell enum. Some(f64) only
// when the cell was the String variant and parsed cleanly.
fn convert_kline_item_inner_enum_string_to_float(kline: Option<KlinesItemInner>) -> Option<f64> {
    kline.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

impl TryFrom<Vec<KlinesItemInner>> for BNKline {
    type Error = BNKlineError;

    fn try_from(vec_inner_klines: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        debug_assert_eq!(12, vec_inner_klines.len());

        let mut items = vec_inner_klines.into_iter();
        let open_timestamp_ms = match items.next().ok_or(BNKlineError::InvalidLength)? {
            KlinesItemInner::Integer(a) => a,
            _ => return Err(BNKlineError::InvalidType("open_time".to_string())),
        };

        // Skip open/high/low, keep the close (cell index 4)
        let _ = items.next();
        let _ = items.next();
        let _ = items.next();
        let close_price = convert_kline_item_inner_enum_string_to_float(items.next());

        Ok(BNKline {
            open_timestamp_ms,
            close_price,
        })
    }
}

fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<BNKline>, BNKlineError> {
    data.into_iter().map(Vec::try_into).collect()
}

async fn configure_binance_client() -> Result<RestApi, anyhow::Error> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

async fn handle_rate_limits(
    rate_limits: &Option<Vec<RestApiRateLimit>>,
    bn_weight_limit_minute: u32,
) -> Result<(), anyhow::Error> {
    if let Some(value) = rate_limits {
        for rate_limit in value {
            if rate_limit.interval_num == 1 && rate_limit.interval == binance_interval::Minute {
                let current_weight = rate_limit.count;
                let required_headroom =
                    bn_weight_limit_minute.saturating_sub(BINANCE.limits.kline_call_weight);
                if current_weight > required_headroom {
                    log::info!(
                        "Current weight ({}) > required headroom ({}), sleeping until start of next minute",
                        current_weight,
                        required_headroom,
                    );

                    // Compute time until start of next minute
                    let time_now = SystemTime::now();
                    let duration_since_epoch = time_now
                        .duration_since(SystemTime::UNIX_EPOCH)
                        .unwrap_or_default();
                    let secs_into_min = duration_since_epoch.as_secs() % 60;
                    let sleep_duration = if secs_into_min == 0 {
                        Duration::from_secs(60)
                    } else {
                        Duration::from_secs(60 - secs_into_min)
                    };
                    sleep(sleep_duration).await;
                    log::info!("Awake at start of a new minute");
                }
            }
        }
    }
    Ok(())
}

fn process_new_klines(
    new_klines: Vec<Vec<KlinesItemInner>>,
    limit_klines_returned: i32,
    all_klines: &mut Vec<BNKline>,
    symbol: &str,
) -> Result<(Option<i64>, bool), anyhow::Error> {
    let mut bn_klines = convert_klines(new_klines)
        .map_err(|e| anyhow::Error::new(e).context(format!("{} convert_klines failed", symbol)))?;

    if bn_klines.is_empty() {
        bail!("{}: convert_klines produced zero klines (unexpected).", symbol);
    }

    // Will we finish after this batch?
    let mut read_all_klines = false;
    if bn_klines.len() < limit_klines_returned as usize {
        read_all_klines = true;
    }

    // New end_time is open time of first entry in bn_klines
    let end_time = Some(bn_klines[0].open_timestamp_ms);

    // If we already have klines, the last of this batch duplicates the first
    // we hold (Binance end_time is inclusive)
    if !all_klines.is_empty() {
        let last_bn_klines_open_timestamp_ms = &bn_klines[bn_klines.len() - 1].open_timestamp_ms;
        let first_all_klines_open_timestamp_ms = &all_klines[0].open_timestamp_ms;
        debug_assert_eq!(
            last_bn_klines_open_timestamp_ms,
            first_all_klines_open_timestamp_ms
        );
    }

    // Drop the final item: either the inclusive duplicate, or on the very
    // first batch the still-forming candle for today
    bn_klines.pop();
    if bn_klines.is_empty() {
        // Rare case: the batch had a single item prior to duplicate removal.
        log::debug!("Single-item batch before duplicate removal for {}.", symbol);
        return Ok((end_time, true));
    }

    // Prepend the new klines to all_klines
    all_klines.splice(0..0, bn_klines);

    Ok((end_time, read_all_klines))
}

async fn fetch_binance_klines_with_limits(
    rest_client: &RestApi,
    params: KlinesParams,
    symbol: &str,
) -> Result<(Option<Vec<RestApiRateLimit>>, Vec<Vec<KlinesItemInner>>), anyhow::Error> {
    // Make the call
    let response_result = rest_client.klines(params).await;

    match response_result {
        Ok(r) => {
            let rate_limits = r.rate_limits.clone();
            let data = r.data().await?;
            Ok((rate_limits, data))
        }
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                match conn_err {
                    connection_error::ConnectorClientError(msg) => {
                        log::error!("{} Client error: Check your request parameters. {}", symbol, msg);
                    }
                    connection_error::TooManyRequestsError(msg) => {
                        log::error!("{} Rate limit exceeded. Please wait and try again. {}", symbol, msg);
                    }
                    connection_error::RateLimitBanError(msg) => {
                        log::error!("{} IP address banned due to excessive rate limits. {}", symbol, msg);
                    }
                    errors::ConnectorError::ServerError { msg, status_code } => {
                        log::error!("{} Server error: {} (status code: {:?})", symbol, msg, status_code);
                    }
                    errors::ConnectorError::NetworkError(msg) => {
                        log::error!("{} Network error: Check your internet connection. {}", symbol, msg);
                    }
                    errors::ConnectorError::NotFoundError(msg) => {
                        log::error!("Resource not found. {}", msg);
                    }
                    connection_error::BadRequestError(msg) => {
                        log::error!("{} Bad request: Verify your input parameters. {}", symbol, msg);
                    }
                    other => {
                        log::error!("Unexpected ConnectionError variant: {:?}", other);
                    }
                }
                Err(
                    anyhow::Error::new(BNKlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Binance API call failed for {}", symbol)),
                )
            } else {
                log::error!("An unexpected error occurred for {}: {:#}", symbol, e);
                Err(anyhow::Error::new(BNKlineError::ConnectionFailed(e.to_string()))
                    .context(format!("Unexpected error during API call for {}", symbol)))
            }
        }
    }
}

/// Page the daily klines backwards from now until the configured span is
/// covered (or Binance runs out of history).
pub async fn load_daily_klines(symbol: &str) -> Result<Vec<BNKline>, anyhow::Error> {
    let rest_client = configure_binance_client().await?;

    let limit_klines_returned: i32 = BINANCE.limits.klines_limit;
    let span_start_ms =
        time_utils::local_now_as_timestamp_ms() - BINANCE.fetch_span_days * TimeUtils::MS_IN_D;
    let mut end_time: Option<i64> = None;
    let mut all_klines: Vec<BNKline> = Vec::new();

    loop {
        let params = KlinesParams::builder(symbol.to_string(), KlinesIntervalEnum::Interval1d)
            .limit(limit_klines_returned)
            .end_time(end_time)
            .build()?;

        // Fetch rate limits + inner kline data in one helper
        let (rate_limits, new_klines) =
            fetch_binance_klines_with_limits(&rest_client, params, symbol).await?;

        // Handle rate-limits (may await/sleep)
        handle_rate_limits(&rate_limits, BINANCE.limits.weight_limit_minute).await?;

        // Convert & splice the new klines into all_klines
        let (new_end_time, batch_read_all) =
            process_new_klines(new_klines, limit_klines_returned, &mut all_klines, symbol)?;
        end_time = new_end_time;

        let span_covered = end_time.is_some_and(|t| t <= span_start_ms);
        if batch_read_all || span_covered {
            break;
        }
    }

    // Trim anything older than the requested span
    all_klines.retain(|kline| kline.open_timestamp_ms >= span_start_ms);

    if all_klines.is_empty() {
        bail!("No klines within the requested {}-day span", BINANCE.fetch_span_days);
    }
    if has_duplicate_kline_open_time(&all_klines) {
        bail!("has_duplicate_kline_open_time() failed for {} so bailing load_daily_klines()!", symbol);
    }
    Ok(all_klines)
}

fn has_duplicate_kline_open_time(klines: &[BNKline]) -> bool {
    // Checks whether kline.open_time is duplicated anywhere in the `klines` slice
    let mut seen_ids = HashSet::new();
    for kline in klines {
        if !seen_ids.insert(kline.open_timestamp_ms) {
            // If `insert` returns `false` the element was already present
            return true;
        }
    }
    false
}
