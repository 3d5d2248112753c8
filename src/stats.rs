use crate::data::StockData;
use crate::error::SimError;

/// Per-step drift and volatility of log returns. Computed once per
/// simulation request, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReturnStatistics {
    pub mu: f64,
    pub sigma: f64,
}

/// Estimates GBM drift and volatility from a closing-price history.
///
/// Takes the log return `ln(P_i / P_{i-1})` of each consecutive close pair,
/// dropping non-finite values from non-positive prices. `sigma` is the sample
/// standard deviation of the returns; `mu` is their sample mean plus
/// `sigma^2 / 2`, the Itô correction that converts the log-price drift into
/// the drift parameter of the GBM exponential.
pub fn estimate(data: &StockData) -> Result<ReturnStatistics, SimError> {
    let returns: Vec<f64> = data
        .history
        .windows(2)
        .map(|w| (w[1].close / w[0].close).ln())
        .filter(|r| r.is_finite())
        .collect();

    if returns.is_empty() {
        let usable = data.history.iter().filter(|p| p.close > 0.0).count();
        return Err(SimError::InsufficientData(usable));
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    // A single return has no sample variance (n - 1 = 0); its sigma is zero.
    let variance = if returns.len() > 1 {
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    let sigma = variance.sqrt();

    Ok(ReturnStatistics {
        mu: mean + sigma * sigma / 2.0,
        sigma,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PricePoint, StockData};
    use chrono::{Duration, Utc};

    fn series(closes: &[f64]) -> StockData {
        let start = Utc::now() - Duration::days(closes.len() as i64);
        StockData {
            symbol: "TEST".to_string(),
            history: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: start + Duration::days(i as i64),
                    close,
                })
                .collect(),
        }
    }

    #[test]
    fn test_estimate_known_series() {
        // Returns are ln(2) and ln(0.5); mean 0, std |ln 2| under n-1.
        let stats = estimate(&series(&[100.0, 200.0, 100.0])).unwrap();
        let expected_sigma = 2f64.ln() * 2f64.sqrt();
        assert!((stats.sigma - expected_sigma).abs() < 1e-12);
        assert!((stats.mu - expected_sigma * expected_sigma / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_finite_for_positive_series() {
        let data = StockData::new_mock("TEST", 252);
        let stats = estimate(&data).unwrap();
        assert!(stats.mu.is_finite());
        assert!(stats.sigma >= 0.0);
    }

    #[test]
    fn test_estimate_constant_series_has_zero_sigma() {
        let stats = estimate(&series(&[50.0; 30])).unwrap();
        assert_eq!(stats.sigma, 0.0);
        assert_eq!(stats.mu, 0.0);
    }

    #[test]
    fn test_estimate_rejects_short_series() {
        assert!(matches!(
            estimate(&series(&[])),
            Err(SimError::InsufficientData(_))
        ));
        assert!(matches!(
            estimate(&series(&[100.0])),
            Err(SimError::InsufficientData(1))
        ));
    }

    #[test]
    fn test_estimate_drops_non_positive_prices() {
        // ln against the zero close is non-finite on both sides and must not
        // poison the estimate.
        let clean = estimate(&series(&[100.0, 110.0, 121.0])).unwrap();
        let dirty = estimate(&series(&[100.0, 110.0, 0.0, 110.0, 121.0])).unwrap();
        assert!(dirty.mu.is_finite());
        assert!(dirty.sigma >= 0.0);
        assert!((dirty.mu - clean.mu).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_all_invalid_is_insufficient() {
        assert!(matches!(
            estimate(&series(&[0.0, -5.0, 0.0])),
            Err(SimError::InsufficientData(_))
        ));
    }
}
