//! Property tests for generation and epsilon-greedy runs.
//!
//! 1. **AR(1) seeding**: `latency[i][0] == mean_i` for every node.
//! 2. **Determinism**: same inputs + same seed → identical outputs.
//! 3. **Reward bounds**: `reward > 0`, and `reward <= 1` whenever latency >= 0.
//! 4. **Belief update**: final estimates equal the plain mean of each node's rewards.
//! 5. **Cumulative reward** is non-decreasing.
//! 6. **Top-k ordering**: `0 <= top1 <= top2 <= top5 <= 1`.
//! 7. **Greedy replay**: with `epsilon = 0` every action is the argmax of the
//!    estimates accumulated so far.

use latency_bandit::{generate, run, BanditState, LatencySeries, NodeSpec};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_nodes() -> impl Strategy<Value = Vec<NodeSpec>> {
    prop::collection::vec((0.0f64..100.0, 0.1f64..20.0), 1..8).prop_map(|v| {
        v.into_iter()
            .map(|(mean, variance)| NodeSpec { mean, variance })
            .collect()
    })
}

fn series(nodes: &[NodeSpec], horizon: usize, phi: f64, seed: u64) -> LatencySeries {
    generate(nodes, horizon, phi, &mut StdRng::seed_from_u64(seed)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn first_step_is_the_configured_mean(
        nodes in arb_nodes(),
        horizon in 1usize..60,
        phi in 0.0f64..0.99,
        seed in any::<u64>(),
    ) {
        let s = series(&nodes, horizon, phi, seed);
        prop_assert_eq!(s.num_nodes(), nodes.len());
        prop_assert_eq!(s.horizon(), horizon);
        for (i, n) in nodes.iter().enumerate() {
            prop_assert_eq!(s.row(i)[0], n.mean);
        }
    }

    #[test]
    fn generate_and_run_are_reproducible(
        nodes in arb_nodes(),
        horizon in 1usize..80,
        phi in 0.0f64..0.99,
        epsilon in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut a = StdRng::seed_from_u64(seed);
        let mut b = StdRng::seed_from_u64(seed);
        let sa = generate(&nodes, horizon, phi, &mut a).unwrap();
        let sb = generate(&nodes, horizon, phi, &mut b).unwrap();
        prop_assert_eq!(&sa, &sb);
        let ra = run(&sa, epsilon, 0.1, &mut a).unwrap();
        let rb = run(&sb, epsilon, 0.1, &mut b).unwrap();
        prop_assert_eq!(ra, rb);
    }

    #[test]
    fn rewards_are_bounded(
        nodes in arb_nodes(),
        horizon in 1usize..80,
        epsilon in 0.0f64..=1.0,
        alpha in 0.001f64..1.0,
        seed in any::<u64>(),
    ) {
        let s = series(&nodes, horizon, 0.9, seed);
        let r = run(&s, epsilon, alpha, &mut StdRng::seed_from_u64(seed ^ 1)).unwrap();
        for st in &r.steps {
            prop_assert!(st.reward > 0.0, "reward={}", st.reward);
            if st.latency >= 0.0 {
                prop_assert!(st.reward <= 1.0, "reward={} latency={}", st.reward, st.latency);
            }
            prop_assert_eq!(st.reward, (-alpha * st.latency).exp());
            prop_assert_eq!(st.latency, s.row(st.action)[st.step]);
        }
    }

    #[test]
    fn final_estimates_are_sample_means(
        nodes in arb_nodes(),
        horizon in 1usize..200,
        epsilon in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let s = series(&nodes, horizon, 0.5, seed);
        let r = run(&s, epsilon, 0.1, &mut StdRng::seed_from_u64(seed)).unwrap();
        for i in 0..nodes.len() {
            let mine: Vec<f64> = r.steps.iter().filter(|st| st.action == i).map(|st| st.reward).collect();
            prop_assert_eq!(r.final_counts[i], mine.len() as u64);
            if mine.is_empty() {
                prop_assert_eq!(r.final_values[i], 0.0);
            } else {
                let reference = mine.iter().sum::<f64>() / mine.len() as f64;
                prop_assert!((r.final_values[i] - reference).abs() <= 1e-12 * reference.abs().max(1.0),
                    "node {}: {} vs {}", i, r.final_values[i], reference);
            }
        }
    }

    #[test]
    fn cumulative_reward_never_decreases(
        nodes in arb_nodes(),
        horizon in 2usize..200,
        epsilon in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let s = series(&nodes, horizon, 0.9, seed);
        let r = run(&s, epsilon, 0.1, &mut StdRng::seed_from_u64(seed)).unwrap();
        for w in r.cumulative_reward.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
        let total: f64 = r.regrets().iter().sum();
        prop_assert!((r.total_regret() - total).abs() < 1e-9);
    }

    #[test]
    fn top_k_accuracies_are_ordered(
        nodes in arb_nodes(),
        horizon in 1usize..200,
        epsilon in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let s = series(&nodes, horizon, 0.9, seed);
        let r = run(&s, epsilon, 0.1, &mut StdRng::seed_from_u64(seed)).unwrap();
        let t = r.top_k;
        prop_assert!(0.0 <= t.top1.accuracy);
        prop_assert!(t.top1.accuracy <= t.top2.accuracy);
        prop_assert!(t.top2.accuracy <= t.top5.accuracy);
        prop_assert!(t.top5.accuracy <= 1.0);
        prop_assert!(t.top1.picks <= t.top2.picks && t.top2.picks <= t.top5.picks);
    }

    #[test]
    fn zero_epsilon_always_plays_the_running_argmax(
        nodes in arb_nodes(),
        horizon in 1usize..150,
        seed in any::<u64>(),
    ) {
        let s = series(&nodes, horizon, 0.9, seed);
        let r = run(&s, 0.0, 0.1, &mut StdRng::seed_from_u64(seed)).unwrap();
        let mut replay = BanditState::new(nodes.len());
        for st in &r.steps {
            prop_assert!(!st.explored);
            prop_assert_eq!(st.action, replay.greedy_action());
            replay.update(st.action, st.reward);
        }
        prop_assert_eq!(r.steps[0].action, 0);
    }
}
