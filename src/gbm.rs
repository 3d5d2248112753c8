use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::config;
use crate::stats::ReturnStatistics;

/// Immutable configuration for one Monte Carlo run. `mu` and `sigma` are
/// per-step quantities (daily, when estimated from daily closes), so the
/// defaults give `dt = 1` trading day over a one-year horizon.
#[derive(Clone, Copy, Debug)]
pub struct SimulationParameters {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub horizon_steps: usize,
    pub total_time: f64,
    pub path_count: usize,
    /// Master seed for reproducible ensembles; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SimulationParameters {
    pub fn from_stats(s0: f64, stats: ReturnStatistics) -> Self {
        Self {
            s0,
            mu: stats.mu,
            sigma: stats.sigma,
            horizon_steps: config::HORIZON_STEPS,
            total_time: config::TOTAL_TIME,
            path_count: config::PATH_COUNT,
            seed: None,
        }
    }
}

// splitmix64 finalizer: decorrelates the per-path generators derived from one
// master seed, so parallel scheduling cannot change the output.
fn path_seed(master: u64, path_idx: u64) -> u64 {
    let mut z = master.wrapping_add(path_idx.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Simulates `path_count` independent GBM paths and returns their terminal
/// prices. Ordering of the ensemble carries no meaning.
///
/// Each path draws `horizon_steps` standard-normal increments, scales them by
/// `sqrt(dt)`, and accumulates the Brownian sum `W_T`; the terminal price is
/// the closed-form GBM solution at the end of the horizon:
///
/// `S_T = s0 * exp((mu - sigma^2 / 2) * total_time + sigma * W_T)`
///
/// There is no Euler discretization of the price itself, so the exponential
/// step introduces no compounding truncation error. Paths share no mutable
/// state and run in parallel on the rayon pool; with a fixed seed the
/// ensemble is bit-identical across runs and thread counts.
pub fn simulate(params: &SimulationParameters) -> Vec<f64> {
    let dt = params.total_time / params.horizon_steps as f64;
    let sqrt_dt = dt.sqrt();
    let drift = (params.mu - 0.5 * params.sigma * params.sigma) * params.total_time;
    let master = params.seed.unwrap_or_else(|| rand::thread_rng().next_u64());

    (0..params.path_count as u64)
        .into_par_iter()
        .map(|path_idx| {
            let mut rng = StdRng::seed_from_u64(path_seed(master, path_idx));
            let mut w = 0.0f64;
            for _ in 0..params.horizon_steps {
                let z: f64 = rng.sample(StandardNormal);
                w += sqrt_dt * z;
            }
            params.s0 * (drift + params.sigma * w).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily_params() -> SimulationParameters {
        // ~13% annualized drift and ~20% annualized volatility in per-day
        // units, matching what the estimator produces from daily closes.
        SimulationParameters {
            s0: 100.0,
            mu: 0.13 / 252.0,
            sigma: 0.20 / 252f64.sqrt(),
            horizon_steps: 252,
            total_time: 252.0,
            path_count: 2_000,
            seed: Some(7),
        }
    }

    #[test]
    fn test_simulate_returns_path_count_positive_prices() {
        let ensemble = simulate(&daily_params());
        assert_eq!(ensemble.len(), 2_000);
        assert!(ensemble.iter().all(|&p| p.is_finite() && p > 0.0));
    }

    #[test]
    fn test_zero_volatility_is_pure_drift() {
        let params = SimulationParameters {
            sigma: 0.0,
            path_count: 100,
            ..daily_params()
        };
        let expected = params.s0 * (params.mu * params.total_time).exp();
        for price in simulate(&params) {
            assert!((price - expected).abs() < 1e-9 * expected);
        }
    }

    #[test]
    fn test_fixed_seed_is_bit_identical() {
        let params = daily_params();
        assert_eq!(simulate(&params), simulate(&params));

        let reseeded = SimulationParameters {
            seed: Some(8),
            ..params
        };
        assert_ne!(simulate(&params), simulate(&reseeded));
    }

    #[test]
    fn test_ensemble_mean_tracks_expected_growth() {
        let params = SimulationParameters {
            path_count: 20_000,
            ..daily_params()
        };
        let ensemble = simulate(&params);
        let mean = ensemble.iter().sum::<f64>() / ensemble.len() as f64;
        // E[S_T] = s0 * exp(mu * T); allow a few percent of Monte Carlo noise.
        let expected = params.s0 * (params.mu * params.total_time).exp();
        assert!(
            (mean - expected).abs() / expected < 0.05,
            "mean {} too far from {}",
            mean,
            expected
        );
    }
}
