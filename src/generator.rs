//! AR(1) latency generation.
//!
//! Each node's latency follows
//!
//! ```text
//!   x[0] = mean
//!   x[t] = phi * x[t-1] + e[t],   e[t] ~ Normal(mean * (1 - phi), sqrt(variance))
//! ```
//!
//! so the long-run mean is `mean` and the unconditional variance is
//! `variance / (1 - phi^2)`, i.e. larger than the configured innovation
//! variance whenever `phi != 0`.
//!
//! Randomness comes only from the caller's RNG. Draws are consumed node by
//! node (row-major), `horizon - 1` Normal draws per node, so a fixed seed
//! reproduces the same table.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{validate_nodes, NodeSpec};
use crate::stats::{argsort_ascending, mean};

/// Generated latency table of shape `(num_nodes, horizon)`.
///
/// Immutable once built; carries the node specs it was generated from so
/// consumers can compare against the true means.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLatencySeries"))]
pub struct LatencySeries {
    nodes: Vec<NodeSpec>,
    phi: f64,
    horizon: usize,
    /// Row-major values: `values[i * horizon + t]`.
    values: Vec<f64>,
}

impl LatencySeries {
    /// Build a series from precomputed rows (one per node, equal lengths).
    pub fn from_rows(nodes: Vec<NodeSpec>, phi: f64, rows: Vec<Vec<f64>>) -> Result<Self> {
        validate_nodes(&nodes)?;
        validate_phi(phi)?;
        if rows.len() != nodes.len() {
            return Err(Error::invalid(
                "rows",
                format!("expected {} rows (one per node), got {}", nodes.len(), rows.len()),
            ));
        }
        let horizon = rows.first().map(Vec::len).unwrap_or(0);
        if horizon == 0 {
            return Err(Error::invalid("rows", "rows must be non-empty"));
        }
        let mut values = Vec::with_capacity(horizon * rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != horizon {
                return Err(Error::invalid(
                    format!("rows[{i}]"),
                    format!("expected length {horizon}, got {}", row.len()),
                ));
            }
            if let Some(t) = row.iter().position(|x| !x.is_finite()) {
                return Err(Error::invalid(format!("rows[{i}][{t}]"), "must be finite"));
            }
            values.extend(row);
        }
        Ok(Self {
            nodes,
            phi,
            horizon,
            values,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Node specs, in index order.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Latency trace of node `i`.
    ///
    /// # Panics
    ///
    /// If `i >= num_nodes()`.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.horizon;
        &self.values[start..start + self.horizon]
    }

    /// Latency of node `i` at step `t`, or `None` if out of range.
    pub fn get(&self, i: usize, t: usize) -> Option<f64> {
        if i >= self.nodes.len() || t >= self.horizon {
            return None;
        }
        self.values.get(i * self.horizon + t).copied()
    }

    /// Iterate over rows in node order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.horizon.max(1))
    }

    /// Configured long-run means, in node order.
    pub fn true_means(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.mean).collect()
    }

    /// Sample mean of each generated row.
    pub fn observed_means(&self) -> Vec<f64> {
        self.rows().map(|r| mean(r).unwrap_or(0.0)).collect()
    }

    /// Index of the node with the lowest true mean (lowest index on ties).
    pub fn best_node(&self) -> usize {
        argsort_ascending(&self.true_means())
            .first()
            .copied()
            .unwrap_or(0)
    }
}

/// Wire form of [`LatencySeries`]; only reaches the public type through
/// [`LatencySeries::from_rows`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLatencySeries {
    nodes: Vec<NodeSpec>,
    phi: f64,
    horizon: usize,
    values: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLatencySeries> for LatencySeries {
    type Error = Error;

    fn try_from(raw: RawLatencySeries) -> Result<Self> {
        if raw.horizon == 0 {
            return Err(Error::invalid("horizon", "must be >= 1"));
        }
        if raw.values.len() != raw.nodes.len() * raw.horizon {
            return Err(Error::invalid(
                "values",
                format!(
                    "expected {} values ({} nodes x horizon {}), got {}",
                    raw.nodes.len() * raw.horizon,
                    raw.nodes.len(),
                    raw.horizon,
                    raw.values.len()
                ),
            ));
        }
        let rows = raw.values.chunks_exact(raw.horizon).map(<[f64]>::to_vec).collect();
        Self::from_rows(raw.nodes, raw.phi, rows)
    }
}

pub(crate) fn validate_phi(phi: f64) -> Result<()> {
    if !(phi.is_finite() && phi.abs() < 1.0) {
        return Err(Error::invalid(
            "phi",
            format!("must satisfy |phi| < 1 for a stationary process, got {phi}"),
        ));
    }
    Ok(())
}

/// Generate one AR(1) trace of length `horizon` per node.
///
/// Preconditions: at least one node, every variance `> 0`, `horizon >= 1`,
/// `|phi| < 1`. All are checked before the RNG is touched.
pub fn generate<R: Rng + ?Sized>(
    nodes: &[NodeSpec],
    horizon: usize,
    phi: f64,
    rng: &mut R,
) -> Result<LatencySeries> {
    validate_nodes(nodes)?;
    validate_phi(phi)?;
    if horizon < 1 {
        return Err(Error::invalid("horizon", "must be >= 1"));
    }

    // Build every innovation distribution before drawing so that an invalid node
    // cannot leave the RNG partially consumed.
    let innovations = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            Normal::new(n.mean * (1.0 - phi), n.std_dev())
                .map_err(|e| Error::invalid(format!("nodes[{i}]"), e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut values = Vec::with_capacity(nodes.len() * horizon);
    for (n, dist) in nodes.iter().zip(&innovations) {
        let mut prev = n.mean;
        values.push(prev);
        for _ in 1..horizon {
            prev = phi * prev + dist.sample(rng);
            values.push(prev);
        }
    }

    debug!(nodes = nodes.len(), horizon, phi, "generated latency series");

    Ok(LatencySeries {
        nodes: nodes.to_vec(),
        phi,
        horizon,
        values,
    })
}
