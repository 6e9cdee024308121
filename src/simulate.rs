//! One epsilon-greedy run over a generated latency table.
//!
//! At each step `t`:
//! 1. select a node (explore with probability `epsilon`, else argmax),
//! 2. observe `reward = exp(-alpha * latency[action][t])`,
//! 3. fold the reward into the node's running mean,
//! 4. record `regret = optimal_reward - reward`.
//!
//! `optimal_reward` is `exp(-alpha * min(true means))`: an oracle that knows
//! the long-run means, not the instantaneous latencies. Per-step regret can
//! therefore be negative when a noisy latency dips below the best mean; it is
//! recorded as-is.

use rand::Rng;
use tracing::{debug, debug_span, trace};

use crate::error::{Error, Result};
use crate::generator::LatencySeries;
use crate::policy::{validate_epsilon, EpsilonGreedy};
use crate::stats::{argsort_ascending, cumulative_sum, running_average};

/// The `k` values reported by [`TopK`].
pub const TOP_K: [usize; 3] = [1, 2, 5];

/// Per-run parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Exploration rate in `[0, 1]`.
    pub epsilon: f64,
    /// Reward sharpness (must be > 0).
    pub alpha: f64,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)?;
        validate_alpha(self.alpha)
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(Error::invalid(
            "alpha",
            format!("must be finite and > 0, got {alpha}"),
        ));
    }
    Ok(())
}

/// One step of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    pub step: usize,
    /// Selected node index.
    pub action: usize,
    /// Latency observed from the selected node at this step.
    pub latency: f64,
    pub reward: f64,
    pub regret: f64,
    /// Whether the action came from the exploration branch.
    pub explored: bool,
}

/// How often the chosen node was among the `k` best by true mean.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopKAccuracy {
    pub k: usize,
    /// Steps whose action was in the top-k set.
    pub picks: u64,
    /// `picks / horizon`.
    pub accuracy: f64,
}

/// Top-1/2/5 accuracies. The sets are nested, so the accuracies are ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopK {
    pub top1: TopKAccuracy,
    pub top2: TopKAccuracy,
    pub top5: TopKAccuracy,
}

impl TopK {
    pub fn iter(&self) -> impl Iterator<Item = &TopKAccuracy> + '_ {
        [&self.top1, &self.top2, &self.top5].into_iter()
    }
}

/// Full trace and summary of one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    pub epsilon: f64,
    pub alpha: f64,
    /// Oracle reward used as the regret baseline.
    pub optimal_reward: f64,
    /// One record per step, ordered by step.
    pub steps: Vec<StepRecord>,
    pub cumulative_regret: Vec<f64>,
    pub cumulative_reward: Vec<f64>,
    /// `cumulative_regret[t] / (t + 1)`.
    pub average_regret: Vec<f64>,
    pub top_k: TopK,
    /// Selection counts at the end of the run.
    pub final_counts: Vec<u64>,
    /// Value estimates at the end of the run.
    pub final_values: Vec<f64>,
}

impl RunResult {
    pub fn horizon(&self) -> usize {
        self.steps.len()
    }

    pub fn actions(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.action).collect()
    }

    pub fn rewards(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    pub fn regrets(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.regret).collect()
    }

    pub fn total_reward(&self) -> f64 {
        self.cumulative_reward.last().copied().unwrap_or(0.0)
    }

    pub fn total_regret(&self) -> f64 {
        self.cumulative_regret.last().copied().unwrap_or(0.0)
    }

    /// Fraction of steps taken by the exploration branch.
    pub fn exploration_rate(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.steps.iter().filter(|s| s.explored).count() as f64 / self.steps.len() as f64
    }
}

/// Run epsilon-greedy over `latencies` for its full horizon.
///
/// Fails only if `epsilon` is outside `[0, 1]` or `alpha <= 0`; nothing is
/// drawn from `rng` in that case.
pub fn run<R: Rng + ?Sized>(
    latencies: &LatencySeries,
    epsilon: f64,
    alpha: f64,
    rng: &mut R,
) -> Result<RunResult> {
    run_with(latencies, RunConfig { epsilon, alpha }, rng)
}

/// Like [`run`], taking a [`RunConfig`].
pub fn run_with<R: Rng + ?Sized>(
    latencies: &LatencySeries,
    cfg: RunConfig,
    rng: &mut R,
) -> Result<RunResult> {
    cfg.validate()?;
    let RunConfig { epsilon, alpha } = cfg;
    let horizon = latencies.horizon();
    let num_nodes = latencies.num_nodes();

    let span = debug_span!("run", epsilon, alpha, horizon, nodes = num_nodes);
    let _enter = span.enter();

    let true_means = latencies.true_means();
    let best_mean = true_means.iter().copied().fold(f64::INFINITY, f64::min);
    let optimal_reward = (-alpha * best_mean).exp();

    let mut policy = EpsilonGreedy::new(num_nodes, epsilon)?;
    let mut steps = Vec::with_capacity(horizon);

    for t in 0..horizon {
        let sel = policy.select(rng);
        let latency = latencies.row(sel.action)[t];
        let reward = (-alpha * latency).exp();
        policy.update(sel.action, reward);
        let regret = optimal_reward - reward;
        trace!(step = t, action = sel.action, explored = sel.explored, latency, reward, regret);
        steps.push(StepRecord {
            step: t,
            action: sel.action,
            latency,
            reward,
            regret,
            explored: sel.explored,
        });
    }

    let rewards: Vec<f64> = steps.iter().map(|s| s.reward).collect();
    let regrets: Vec<f64> = steps.iter().map(|s| s.regret).collect();
    let ranking = argsort_ascending(&true_means);
    let top_k = TopK {
        top1: top_k_accuracy(&steps, &ranking, TOP_K[0]),
        top2: top_k_accuracy(&steps, &ranking, TOP_K[1]),
        top5: top_k_accuracy(&steps, &ranking, TOP_K[2]),
    };
    let state = policy.into_state();

    let result = RunResult {
        epsilon,
        alpha,
        optimal_reward,
        cumulative_regret: cumulative_sum(&regrets),
        cumulative_reward: cumulative_sum(&rewards),
        average_regret: running_average(&regrets),
        steps,
        top_k,
        final_counts: state.counts().to_vec(),
        final_values: state.values().to_vec(),
    };

    debug!(
        total_reward = result.total_reward(),
        total_regret = result.total_regret(),
        top1 = result.top_k.top1.accuracy,
        top2 = result.top_k.top2.accuracy,
        top5 = result.top_k.top5.accuracy,
        "run finished"
    );
    Ok(result)
}

/// Accuracy of `steps` against the first `k` entries of `ranking`.
///
/// With fewer than `k` nodes the good set is every node.
fn top_k_accuracy(steps: &[StepRecord], ranking: &[usize], k: usize) -> TopKAccuracy {
    let good = &ranking[..k.min(ranking.len())];
    let picks = steps.iter().filter(|s| good.contains(&s.action)).count() as u64;
    let accuracy = if steps.is_empty() {
        0.0
    } else {
        picks as f64 / steps.len() as f64
    };
    TopKAccuracy { k, picks, accuracy }
}
