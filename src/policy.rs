//! Epsilon-greedy node selection over incremental sample-mean estimates.
//!
//! Notes:
//! - The policy holds no RNG; every draw comes from the caller's source.
//! - Greedy ties go to the lowest node index (all estimates start at zero,
//!   so the very first greedy pick is node 0).
//! - With `epsilon == 0` selection is fully deterministic and consumes no
//!   randomness at all.

use rand::Rng;

use crate::error::{Error, Result};
use crate::stats::argmax;

/// Per-node running statistics for one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BanditState {
    counts: Vec<u64>,
    values: Vec<f64>,
}

impl BanditState {
    /// Zeroed state for `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            counts: vec![0; num_nodes],
            values: vec![0.0; num_nodes],
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.counts.len()
    }

    /// Times each node has been selected.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Current value estimate (mean observed reward) per node.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn count(&self, node: usize) -> u64 {
        self.counts.get(node).copied().unwrap_or(0)
    }

    pub fn value(&self, node: usize) -> f64 {
        self.values.get(node).copied().unwrap_or(0.0)
    }

    /// Node with the highest estimate; lowest index among ties.
    pub fn greedy_action(&self) -> usize {
        argmax(&self.values).unwrap_or(0)
    }

    /// Fold one observed reward into `node`'s running mean.
    ///
    /// `count` is incremented before the division, so it is never zero there.
    /// Other nodes are untouched. Out-of-range indices are ignored.
    pub fn update(&mut self, node: usize, reward: f64) {
        let (Some(n), Some(v)) = (self.counts.get_mut(node), self.values.get_mut(node)) else {
            return;
        };
        *n += 1;
        *v += (reward - *v) / *n as f64;
    }
}

/// Outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Chosen node index.
    pub action: usize,
    /// True if the node was drawn uniformly (exploration) rather than by argmax.
    pub explored: bool,
}

/// Epsilon-greedy policy.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    state: BanditState,
}

impl EpsilonGreedy {
    /// Create a policy over `num_nodes` nodes with exploration rate `epsilon`.
    pub fn new(num_nodes: usize, epsilon: f64) -> Result<Self> {
        validate_epsilon(epsilon)?;
        if num_nodes == 0 {
            return Err(Error::invalid("nodes", "at least one node is required"));
        }
        Ok(Self {
            epsilon,
            state: BanditState::new(num_nodes),
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn state(&self) -> &BanditState {
        &self.state
    }

    /// Consume the policy, keeping only its final statistics.
    pub fn into_state(self) -> BanditState {
        self.state
    }

    /// Pick a node.
    ///
    /// Draws `u ~ U[0, 1)`; if `u < epsilon` a node is drawn uniformly,
    /// otherwise the greedy node is returned. No draw happens when
    /// `epsilon == 0`.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Selection {
        if self.epsilon > 0.0 {
            let u: f64 = rng.random();
            if u < self.epsilon {
                return Selection {
                    action: rng.random_range(0..self.state.num_nodes()),
                    explored: true,
                };
            }
        }
        Selection {
            action: self.state.greedy_action(),
            explored: false,
        }
    }

    /// Record the reward observed for `action`.
    pub fn update(&mut self, action: usize, reward: f64) {
        self.state.update(action, reward);
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(Error::invalid(
            "epsilon",
            format!("must be in [0, 1], got {epsilon}"),
        ));
    }
    Ok(())
}
