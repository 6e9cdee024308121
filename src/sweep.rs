//! Evaluate several exploration rates against the same latency table.
//!
//! Every configuration gets its own [`StdRng`] seeded by
//! [`derive_seed`](crate::derive_seed)`(seed, epsilon)` and its own policy
//! state, so results are identical whether the sweep runs sequentially or
//! (feature `parallel`) on a rayon pool.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generator::LatencySeries;
use crate::policy::validate_epsilon;
use crate::seed::derive_seed;
use crate::simulate::{run_with, validate_alpha, RunConfig, RunResult};

/// Parameters shared by all runs of a sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepConfig {
    /// Exploration rates to evaluate, reported in this order.
    pub epsilons: Vec<f64>,
    pub alpha: f64,
    /// Base seed; each epsilon's RNG is derived from it.
    pub seed: u64,
}

impl SweepConfig {
    /// Check every epsilon and `alpha` before anything runs.
    pub fn validate(&self) -> Result<()> {
        if self.epsilons.is_empty() {
            return Err(Error::invalid("epsilons", "at least one epsilon is required"));
        }
        for (i, &e) in self.epsilons.iter().enumerate() {
            validate_epsilon(e).map_err(|_| {
                Error::invalid(format!("epsilons[{i}]"), format!("must be in [0, 1], got {e}"))
            })?;
        }
        validate_alpha(self.alpha)
    }

    fn run_one(&self, latencies: &LatencySeries, epsilon: f64) -> Result<RunResult> {
        let mut rng = StdRng::seed_from_u64(derive_seed(self.seed, epsilon));
        run_with(
            latencies,
            RunConfig {
                epsilon,
                alpha: self.alpha,
            },
            &mut rng,
        )
    }
}

/// Run every configured epsilon in order.
pub fn sweep(latencies: &LatencySeries, cfg: &SweepConfig) -> Result<Vec<RunResult>> {
    cfg.validate()?;
    let results = cfg
        .epsilons
        .iter()
        .map(|&e| cfg.run_one(latencies, e))
        .collect::<Result<Vec<_>>>()?;
    log_summary(&results);
    Ok(results)
}

/// Parallel [`sweep`]: same output, one rayon task per epsilon.
#[cfg(feature = "parallel")]
pub fn sweep_parallel(latencies: &LatencySeries, cfg: &SweepConfig) -> Result<Vec<RunResult>> {
    use rayon::prelude::*;

    cfg.validate()?;
    let results = cfg
        .epsilons
        .par_iter()
        .map(|&e| cfg.run_one(latencies, e))
        .collect::<Result<Vec<_>>>()?;
    log_summary(&results);
    Ok(results)
}

fn log_summary(results: &[RunResult]) {
    for r in results {
        debug!(
            epsilon = r.epsilon,
            top1 = r.top_k.top1.accuracy,
            top2 = r.top_k.top2.accuracy,
            top5 = r.top_k.top5.accuracy,
            total_regret = r.total_regret(),
            "sweep run"
        );
    }
}
