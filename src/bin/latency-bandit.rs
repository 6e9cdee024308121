//! `latency-bandit` CLI: run an epsilon sweep and print the top-k summary.
//!
//! Run:
//! `cargo run --features cli --bin latency-bandit -- --epsilon 0.1 --epsilon 0.6`
//! `cargo run --features cli --bin latency-bandit -- --config sim.json --json > out.json`

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use latency_bandit::{Simulation, SimulationConfig, LATENCY_BANDIT_VERSION};

#[derive(Parser, Debug)]
#[command(name = "latency-bandit", version)]
#[command(about = "Epsilon-greedy node selection over AR(1) latency traces", long_about = None)]
struct Args {
    /// JSON config file; missing fields use the built-in ten-node experiment.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Base seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of steps.
    #[arg(long)]
    horizon: Option<usize>,

    /// AR(1) persistence coefficient.
    #[arg(long)]
    phi: Option<f64>,

    /// Reward sharpness in exp(-alpha * latency).
    #[arg(long)]
    alpha: Option<f64>,

    /// Exploration rate to evaluate (repeatable; replaces the config list).
    #[arg(short, long = "epsilon")]
    epsilons: Vec<f64>,

    /// Emit the full simulation (latencies and traces) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Evaluate epsilons in parallel (requires the `parallel` feature).
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(SimulationConfig, bool, bool)> {
        let mut cfg = match &self.config {
            Some(path) => SimulationConfig::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(horizon) = self.horizon {
            cfg.horizon = horizon;
        }
        if let Some(phi) = self.phi {
            cfg.phi = phi;
        }
        if let Some(alpha) = self.alpha {
            cfg.alpha = alpha;
        }
        if !self.epsilons.is_empty() {
            cfg.epsilons = self.epsilons;
        }
        cfg.validate()?;
        Ok((cfg, self.json, self.parallel))
    }
}

#[cfg(feature = "parallel")]
fn simulate(cfg: &SimulationConfig, parallel: bool) -> anyhow::Result<Simulation> {
    let sim = if parallel {
        cfg.run_parallel()?
    } else {
        cfg.run()?
    };
    Ok(sim)
}

#[cfg(not(feature = "parallel"))]
fn simulate(cfg: &SimulationConfig, parallel: bool) -> anyhow::Result<Simulation> {
    if parallel {
        anyhow::bail!("--parallel requires building with the `parallel` feature");
    }
    Ok(cfg.run()?)
}

fn print_summary(sim: &Simulation) {
    let best = sim.latencies.best_node();
    println!(
        "nodes: {}  horizon: {}  phi: {}  best node: {}",
        sim.latencies.num_nodes(),
        sim.latencies.horizon(),
        sim.latencies.phi(),
        best
    );
    println!();
    for r in &sim.results {
        println!("Epsilon: {}", r.epsilon);
        for acc in r.top_k.iter() {
            println!("Top {} Accuracy: {}", acc.k, acc.accuracy);
        }
        println!("Total Reward: {:.4}", r.total_reward());
        println!("Total Regret: {:.4}", r.total_regret());
        println!(
            "Average Regret: {:.6}",
            r.average_regret.last().copied().unwrap_or(0.0)
        );
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "latency_bandit=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let (cfg, json, parallel) = Args::parse().into_config()?;
    info!(
        version = LATENCY_BANDIT_VERSION,
        nodes = cfg.nodes.len(),
        horizon = cfg.horizon,
        epsilons = ?cfg.epsilons,
        seed = cfg.seed,
        "running simulation"
    );

    let sim = simulate(&cfg, parallel)?;

    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &sim)
            .context("writing JSON output")?;
        println!();
    } else {
        print_summary(&sim);
    }
    Ok(())
}
