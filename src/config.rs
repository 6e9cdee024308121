//! Experiment configuration: nodes, horizon, AR(1) coefficient, reward
//! sharpness, exploration rates and seed.
//!
//! The default reproduces the reference experiment: ten nodes, `T = 1000`,
//! `phi = 0.9`, `alpha = 0.1`, epsilons `[0.1, 0.6]`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::generator::{generate, validate_phi, LatencySeries};
use crate::node::{validate_nodes, NodeSpec};
use crate::simulate::RunResult;
use crate::sweep::{sweep, SweepConfig};

/// Top-level simulation configuration.
///
/// `nodes` order is significant: it defines node indices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SimulationConfig {
    pub nodes: Vec<NodeSpec>,
    /// Number of steps `T`.
    pub horizon: usize,
    /// AR(1) persistence, `|phi| < 1`.
    pub phi: f64,
    /// Reward sharpness in `exp(-alpha * latency)`.
    pub alpha: f64,
    pub epsilons: Vec<f64>,
    /// Seeds latency generation directly and each run through
    /// [`derive_seed`](crate::derive_seed).
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let node = |mean, variance| NodeSpec { mean, variance };
        Self {
            nodes: vec![
                node(10.0, 5.0),
                node(20.0, 5.0),
                node(30.0, 5.0),
                node(40.0, 5.0),
                node(50.0, 5.0),
                node(65.0, 15.0),
                node(60.0, 5.0),
                node(70.0, 5.0),
                node(84.0, 5.0),
                node(78.0, 5.0),
            ],
            horizon: 1_000,
            phi: 0.9,
            alpha: 0.1,
            epsilons: vec![0.1, 0.6],
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Check every generator and simulator precondition.
    pub fn validate(&self) -> Result<()> {
        validate_nodes(&self.nodes)?;
        if self.horizon < 1 {
            return Err(Error::invalid("horizon", "must be >= 1"));
        }
        validate_phi(self.phi)?;
        self.sweep_config().validate()
    }

    /// The sweep half of this configuration.
    pub fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            epsilons: self.epsilons.clone(),
            alpha: self.alpha,
            seed: self.seed,
        }
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    #[cfg(feature = "serde")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Generate latencies and evaluate every epsilon.
    pub fn run(&self) -> Result<Simulation> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let latencies = generate(&self.nodes, self.horizon, self.phi, &mut rng)?;
        debug!(seed = self.seed, epsilons = self.epsilons.len(), "starting sweep");
        let results = sweep(&latencies, &self.sweep_config())?;
        Ok(Simulation { latencies, results })
    }

    /// Like [`run`](Self::run), evaluating epsilons on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self) -> Result<Simulation> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let latencies = generate(&self.nodes, self.horizon, self.phi, &mut rng)?;
        let results = crate::sweep::sweep_parallel(&latencies, &self.sweep_config())?;
        Ok(Simulation { latencies, results })
    }
}

/// Generated data plus one result per epsilon (in config order).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Simulation {
    pub latencies: LatencySeries,
    pub results: Vec<RunResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_experiment() {
        let cfg = SimulationConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.nodes.len(), 10);
        assert_eq!(cfg.nodes[5], NodeSpec { mean: 65.0, variance: 15.0 });
        assert_eq!(cfg.epsilons, vec![0.1, 0.6]);
    }

    #[test]
    fn validate_catches_each_field() {
        let base = SimulationConfig::default();
        let cases = [
            SimulationConfig { nodes: vec![], ..base.clone() },
            SimulationConfig { horizon: 0, ..base.clone() },
            SimulationConfig { phi: 1.0, ..base.clone() },
            SimulationConfig { alpha: 0.0, ..base.clone() },
            SimulationConfig { epsilons: vec![1.5], ..base.clone() },
            SimulationConfig { epsilons: vec![], ..base.clone() },
        ];
        for c in cases {
            assert!(c.validate().unwrap_err().is_invalid_parameter(), "{c:?}");
        }
    }

    #[test]
    fn run_is_reproducible() {
        let cfg = SimulationConfig {
            horizon: 200,
            ..SimulationConfig::default()
        };
        let a = cfg.run().unwrap();
        let b = cfg.run().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.results.len(), 2);
        assert_eq!(a.latencies.horizon(), 200);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = SimulationConfig::from_json_str(
            r#"{ "nodes": [{"mean": 10, "variance": 5}, {"mean": 20, "variance": 5}], "epsilons": [0.0] }"#,
        )
        .unwrap();
        assert_eq!(cfg.nodes.len(), 2);
        assert_eq!(cfg.horizon, 1_000);
        assert_eq!(cfg.phi, 0.9);
        assert_eq!(cfg.epsilons, vec![0.0]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_rejects_invalid_values_and_unknown_fields() {
        let e = SimulationConfig::from_json_str(r#"{ "alpha": -1 }"#).unwrap_err();
        assert!(e.is_invalid_parameter());
        let e = SimulationConfig::from_json_str(r#"{ "alhpa": 0.2 }"#).unwrap_err();
        assert!(matches!(e, Error::Json(_)));
    }

    #[test]
    fn phi_error_matches_the_generator() {
        let cfg = SimulationConfig {
            phi: -1.0,
            ..SimulationConfig::default()
        };
        let from_cfg = cfg.validate().unwrap_err().to_string();
        let from_gen = generate(&cfg.nodes, 10, cfg.phi, &mut StdRng::seed_from_u64(0))
            .unwrap_err()
            .to_string();
        assert_eq!(from_cfg, from_gen);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_file_is_an_io_error() {
        let e = SimulationConfig::from_path("/nonexistent/latency-bandit/sim.json").unwrap_err();
        assert!(matches!(e, Error::Io(_)), "{e}");
    }
}
