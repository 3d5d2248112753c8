use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::prelude::*;
use serde::Deserialize;
use tracing::info;

use crate::error::SimError;

/// One daily closing observation.
#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub close: f64,
}

/// Historical daily closes for a specific symbol, oldest first.
#[derive(Clone, Debug)]
pub struct StockData {
    pub symbol: String,
    pub history: Vec<PricePoint>,
}

/// Ticker metadata used only for display alongside simulation output.
#[derive(Clone, Debug)]
pub struct TickerInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    #[serde(default)]
    result: Vec<YahooResult>,
}

#[derive(Deserialize, Debug)]
struct YahooResult {
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Deserialize, Debug)]
struct YahooQuote {
    close: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Deserialize, Debug)]
struct QuoteSummary {
    #[serde(default)]
    result: Vec<QuoteSummaryResult>,
}

#[derive(Deserialize, Debug, Default)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryProfile")]
    summary_profile: Option<SummaryProfileModule>,
}

#[derive(Deserialize, Debug, Default)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    currency: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Deserialize, Debug)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
struct SummaryProfileModule {
    sector: Option<String>,
    industry: Option<String>,
}

fn chart_to_stock_data(symbol: &str, response: &YahooChartResponse) -> Result<StockData> {
    let result = response
        .chart
        .result
        .first()
        .ok_or(SimError::DataUnavailable(symbol.to_uppercase()))?;
    let quotes = result
        .indicators
        .quote
        .first()
        .ok_or(SimError::DataUnavailable(symbol.to_uppercase()))?;

    let mut history = Vec::with_capacity(result.timestamp.len());
    for (i, &timestamp) in result.timestamp.iter().enumerate() {
        if let Some(close) = quotes.close.get(i).copied().flatten() {
            history.push(PricePoint {
                date: Utc.timestamp_opt(timestamp, 0).single().unwrap_or_else(Utc::now),
                close,
            });
        }
    }

    if history.is_empty() {
        return Err(SimError::DataUnavailable(symbol.to_uppercase()).into());
    }

    Ok(StockData {
        symbol: symbol.to_uppercase(),
        history,
    })
}

/// Fetches historical daily closes from Yahoo Finance.
///
/// # Arguments
/// * `symbol` - The stock ticker symbol (e.g., "AAPL").
/// * `range` - The time range to fetch (e.g., "1y", "5y").
pub async fn fetch_range(symbol: &str, range: &str) -> Result<StockData> {
    let url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d",
        symbol, range
    );

    info!("Fetching {} daily closes ({})...", symbol, range);
    let response = reqwest::Client::new()
        .get(&url)
        .header("User-Agent", "Mozilla/5.0")
        .timeout(std::time::Duration::from_secs(15))
        .send()
        .await?
        .error_for_status()?
        .json::<YahooChartResponse>()
        .await?;

    chart_to_stock_data(symbol, &response)
}

fn quote_summary_to_info(symbol: &str, response: &QuoteSummaryResponse) -> Result<TickerInfo> {
    let result = response
        .quote_summary
        .result
        .first()
        .ok_or(SimError::DataUnavailable(symbol.to_uppercase()))?;

    let price = result.price.as_ref();
    let profile = result.summary_profile.as_ref();

    Ok(TickerInfo {
        symbol: symbol.to_uppercase(),
        name: price.and_then(|p| p.long_name.clone().or_else(|| p.short_name.clone())),
        sector: profile.and_then(|p| p.sector.clone()),
        industry: profile.and_then(|p| p.industry.clone()),
        currency: price.and_then(|p| p.currency.clone()),
        market_cap: price.and_then(|p| p.market_cap.as_ref()).and_then(|m| m.raw),
    })
}

/// Fetches ticker metadata (name, sector, currency, market cap) from the
/// Yahoo Finance quoteSummary endpoint.
pub async fn fetch_ticker_info(symbol: &str) -> Result<TickerInfo> {
    let url = format!(
        "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryProfile",
        symbol
    );

    info!("Fetching {} ticker info...", symbol);
    let response = reqwest::Client::new()
        .get(&url)
        .header("User-Agent", "Mozilla/5.0")
        .timeout(std::time::Duration::from_secs(15))
        .send()
        .await?
        .error_for_status()?
        .json::<QuoteSummaryResponse>()
        .await?;

    quote_summary_to_info(symbol, &response)
}

impl StockData {
    /// Most recent close, the simulation's starting price.
    pub fn latest_close(&self) -> Option<f64> {
        self.history.last().map(|p| p.close)
    }

    #[allow(dead_code)]
    pub fn new_mock(symbol: &str, days: usize) -> Self {
        let mut rng = rand::thread_rng();
        let mut history = Vec::with_capacity(days);
        let mut close: f64 = 100.0;
        let mut date = Utc::now() - Duration::days(days as i64);

        for _ in 0..days {
            let volatility = 0.02; // 2% daily volatility
            let change_pct: f64 = rng.gen_range(-volatility..volatility);
            close *= 1.0 + change_pct;
            history.push(PricePoint { date, close });
            date += Duration::days(1);
        }

        Self {
            symbol: symbol.to_string(),
            history,
        }
    }
}
