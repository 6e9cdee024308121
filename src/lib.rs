//! `latency-bandit`: seedable AR(1) latency generation and epsilon-greedy
//! node selection with regret accounting.
//!
//! You have a small set of nodes (endpoints, replicas, regions) whose latency
//! drifts over time around a long-run mean. A policy picks one node per step,
//! observes a reward derived from that node's current latency, and has to
//! learn which node is fastest while paying for the steps it spends
//! exploring.
//!
//! The crate has two halves:
//!
//! - [`generate`]: per-node AR(1) latency traces from a [`NodeSpec`] list,
//!   `x[t] = phi * x[t-1] + Normal(mean * (1 - phi), sqrt(variance))`,
//!   seeded at `x[0] = mean`.
//! - [`run`]: epsilon-greedy over a [`LatencySeries`], with reward
//!   `exp(-alpha * latency)`, incremental sample-mean updates, and regret
//!   against an oracle that knows the true means. Produces a [`RunResult`]
//!   with the full [`StepRecord`] trace, cumulative/average series and
//!   top-1/2/5 accuracy.
//!
//! [`sweep`] evaluates several exploration rates on one table, and
//! [`SimulationConfig`] wires generation and sweep together from a single
//! (optionally JSON) config.
//!
//! **Goals:**
//! - **Deterministic**: all randomness flows through a caller-supplied
//!   `rand::Rng`; same seed, same output. Sweeps derive one seed per epsilon
//!   so results do not depend on ordering or threading.
//! - **Fail fast**: parameters are validated before any draw; the core either
//!   returns a complete result or an [`Error::InvalidParameter`].
//! - **Explicit tie-breaks**: greedy ties go to the lowest node index.
//!
//! **Non-goals:**
//! - Other bandit strategies (UCB, Thompson sampling, ...).
//! - Non-Gaussian innovations.
//! - Persistence or plotting; the `latency-bandit` binary only prints
//!   summaries or JSON.
//!
//! # Example
//!
//! ```rust
//! use latency_bandit::{generate, run, NodeSpec};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let nodes = vec![
//!     NodeSpec::new(10.0, 5.0).unwrap(),
//!     NodeSpec::new(20.0, 5.0).unwrap(),
//!     NodeSpec::new(30.0, 5.0).unwrap(),
//! ];
//! let mut rng = StdRng::seed_from_u64(0);
//! let latencies = generate(&nodes, 500, 0.9, &mut rng).unwrap();
//! let result = run(&latencies, 0.1, 0.1, &mut rng).unwrap();
//!
//! assert_eq!(result.horizon(), 500);
//! assert!(result.top_k.top1.accuracy <= result.top_k.top2.accuracy);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod node;
pub use node::*;

mod stats;
pub use stats::*;

mod generator;
pub use generator::*;

mod policy;
pub use policy::*;

mod simulate;
pub use simulate::*;

mod seed;
pub use seed::*;

mod sweep;
pub use sweep::*;

mod config;
pub use config::*;

/// Crate version, for tagging emitted reports.
pub const LATENCY_BANDIT_VERSION: &str = env!("CARGO_PKG_VERSION");
