//! Node parameterization.
//!
//! A node is described only by the long-run mean and the innovation variance
//! of its latency process. Collections of nodes are plain ordered slices: the
//! position of a `NodeSpec` is the node's index everywhere else in the crate.

use crate::error::{Error, Result};

/// Immutable description of one candidate node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    /// Long-run mean latency.
    pub mean: f64,
    /// Variance of the per-step Gaussian innovation (must be > 0).
    pub variance: f64,
}

impl NodeSpec {
    /// Create a validated node.
    pub fn new(mean: f64, variance: f64) -> Result<Self> {
        let spec = Self { mean, variance };
        spec.validate("node")?;
        Ok(spec)
    }

    /// Standard deviation of the innovation.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Unconditional variance of an AR(1) process driven by this node.
    ///
    /// Larger than `variance` whenever `phi != 0`: `variance / (1 - phi^2)`.
    pub fn stationary_variance(&self, phi: f64) -> f64 {
        self.variance / (1.0 - phi * phi)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(Error::invalid(
                format!("{name}.mean"),
                format!("must be finite, got {}", self.mean),
            ));
        }
        if !(self.variance.is_finite() && self.variance > 0.0) {
            return Err(Error::invalid(
                format!("{name}.variance"),
                format!("must be finite and > 0, got {}", self.variance),
            ));
        }
        Ok(())
    }
}

/// Validate an ordered node list: non-empty, every entry well-formed.
///
/// Specs built with struct literals bypass [`NodeSpec::new`], so every entry
/// point that accepts a slice runs this first.
pub fn validate_nodes(nodes: &[NodeSpec]) -> Result<()> {
    if nodes.is_empty() {
        return Err(Error::invalid("nodes", "at least one node is required"));
    }
    for (i, n) in nodes.iter().enumerate() {
        n.validate(&format!("nodes[{i}]"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_positive_variance() {
        assert!(NodeSpec::new(10.0, 0.0).is_err());
        assert!(NodeSpec::new(10.0, -1.0).is_err());
        assert!(NodeSpec::new(10.0, f64::NAN).is_err());
        assert!(NodeSpec::new(f64::INFINITY, 1.0).is_err());
        assert!(NodeSpec::new(10.0, 5.0).is_ok());
    }

    #[test]
    fn validate_nodes_reports_offending_index() {
        let nodes = [
            NodeSpec { mean: 1.0, variance: 1.0 },
            NodeSpec { mean: 2.0, variance: 0.0 },
        ];
        let err = validate_nodes(&nodes).unwrap_err();
        assert!(err.to_string().contains("nodes[1].variance"), "{err}");
        assert!(validate_nodes(&[]).is_err());
    }

    #[test]
    fn stationary_variance_inflates_with_phi() {
        let n = NodeSpec::new(0.0, 5.0).unwrap();
        assert_eq!(n.stationary_variance(0.0), 5.0);
        assert!((n.stationary_variance(0.9) - 5.0 / 0.19).abs() < 1e-9);
    }
}
