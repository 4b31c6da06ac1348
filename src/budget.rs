//! Token budget selection.
//!
//! A greedy value-density knapsack with a bounded exchange pass on top.
//! Selection decides membership only; the emitted order always comes from
//! the orderer's sequence.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::model::{FileNode, RejectReason, Rejection};

/// Maximum improvement rounds after the greedy pass.
const EXCHANGE_ROUNDS: usize = 8;

/// The selection outcome: membership, cost, and the files that missed.
#[derive(Debug, Clone)]
pub struct BudgetPlan {
    /// Accepted paths in the orderer's sequence order.
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<Rejection>,
    pub tokens_used: usize,
    /// The ceiling was too small for even the cheapest candidate.
    pub infeasible: bool,
}

/// Select files under a token ceiling.
///
/// `None` admits everything. Otherwise files are admitted greedily by
/// score-per-token, skipping what no longer fits rather than stopping, and
/// a few exchange rounds then trade a weak admission for a stronger
/// rejection when the swap fits. An empty selection is a valid outcome.
pub fn select(nodes: &[FileNode], sequence: &[PathBuf], ceiling: Option<usize>) -> BudgetPlan {
    let by_path: HashMap<&Path, &FileNode> = nodes
        .iter()
        .map(|node| (node.path.as_path(), node))
        .collect();

    let ceiling = match ceiling {
        Some(limit) => limit,
        None => {
            let total = nodes.iter().map(FileNode::effective_tokens).sum();
            return BudgetPlan {
                accepted: sequence.to_vec(),
                rejected: Vec::new(),
                tokens_used: total,
                infeasible: false,
            };
        }
    };

    // Greedy pass: admit by value density, best first.
    let mut candidates: Vec<&FileNode> = nodes.iter().collect();
    candidates.sort_by(|a, b| {
        density(b)
            .partial_cmp(&density(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut admitted: HashSet<&Path> = HashSet::new();
    let mut tokens_used = 0usize;
    for node in &candidates {
        let cost = node.effective_tokens();
        if tokens_used + cost <= ceiling {
            admitted.insert(node.path.as_path());
            tokens_used += cost;
        }
    }

    // Exchange pass: one swap per round, while a strictly better trade
    // exists.
    for _ in 0..EXCHANGE_ROUNDS {
        let weakest = admitted
            .iter()
            .filter_map(|path| by_path.get(path))
            .min_by(|a, b| {
                a.score
                    .combined
                    .partial_cmp(&b.score.combined)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.path.cmp(&b.path))
            })
            .copied();
        let Some(weakest) = weakest else { break };

        let slack = ceiling - tokens_used + weakest.effective_tokens();
        let replacement = candidates
            .iter()
            .filter(|node| {
                !admitted.contains(node.path.as_path())
                    && node.score.combined > weakest.score.combined
                    && node.effective_tokens() <= slack
            })
            .max_by(|a, b| {
                a.score
                    .combined
                    .partial_cmp(&b.score.combined)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.path.cmp(&a.path))
            })
            .copied();

        match replacement {
            Some(better) => {
                debug!(
                    evicted = %weakest.path.display(),
                    admitted = %better.path.display(),
                    "budget exchange"
                );
                admitted.remove(weakest.path.as_path());
                admitted.insert(better.path.as_path());
                tokens_used = tokens_used - weakest.effective_tokens() + better.effective_tokens();
            }
            None => break,
        }
    }

    let accepted: Vec<PathBuf> = sequence
        .iter()
        .filter(|path| admitted.contains(path.as_path()))
        .cloned()
        .collect();
    let rejected: Vec<Rejection> = sequence
        .iter()
        .filter(|path| !admitted.contains(path.as_path()))
        .map(|path| Rejection {
            path: path.clone(),
            reason: RejectReason::ExceededBudget,
        })
        .collect();
    let infeasible = accepted.is_empty() && !nodes.is_empty();

    debug!(
        accepted = accepted.len(),
        rejected = rejected.len(),
        tokens_used,
        ceiling,
        "budget selection complete"
    );
    BudgetPlan {
        accepted,
        rejected,
        tokens_used,
        infeasible,
    }
}

/// Score per token. Zero-cost files are infinitely dense — they are free
/// to include.
fn density(node: &FileNode) -> f64 {
    let cost = node.effective_tokens();
    if cost == 0 {
        return f64::INFINITY;
    }
    node.score.combined / cost as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SupportedLanguage;
    use crate::model::ScoreComponents;
    use std::collections::BTreeSet;

    fn node(path: &str, combined: f64, tokens: usize) -> FileNode {
        FileNode {
            path: PathBuf::from(path),
            content: String::new(),
            size: 0,
            language: Some(SupportedLanguage::Rust),
            defines: BTreeSet::new(),
            references: BTreeSet::new(),
            degraded: false,
            tokens,
            score: ScoreComponents {
                combined,
                ..ScoreComponents::default()
            },
            compressed: None,
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn no_ceiling_admits_everything() {
        let nodes = vec![node("a.rs", 1.0, 100), node("b.rs", 2.0, 200)];
        let plan = select(&nodes, &paths(&["b.rs", "a.rs"]), None);
        assert_eq!(plan.accepted, paths(&["b.rs", "a.rs"]));
        assert!(plan.rejected.is_empty());
        assert_eq!(plan.tokens_used, 300);
        assert!(!plan.infeasible);
    }

    #[test]
    fn ceiling_is_never_exceeded() {
        let nodes = vec![
            node("a.rs", 900.0, 400),
            node("b.rs", 800.0, 400),
            node("c.rs", 700.0, 400),
        ];
        let plan = select(&nodes, &paths(&["a.rs", "b.rs", "c.rs"]), Some(900));
        assert!(plan.tokens_used <= 900);
        assert_eq!(plan.accepted.len(), 2);
        assert_eq!(plan.rejected.len(), 1);
        assert_eq!(plan.rejected[0].reason, RejectReason::ExceededBudget);
    }

    #[test]
    fn greedy_skips_the_unaffordable_and_continues() {
        // The best-density file is huge; the two small ones still fit.
        let nodes = vec![
            node("huge.rs", 9000.0, 2000),
            node("a.rs", 100.0, 100),
            node("b.rs", 90.0, 100),
        ];
        let plan = select(&nodes, &paths(&["huge.rs", "a.rs", "b.rs"]), Some(250));
        assert_eq!(plan.accepted, paths(&["a.rs", "b.rs"]));
    }

    #[test]
    fn exchange_pass_fixes_greedy_density_traps() {
        // Density favors the two small files (1.0/token) over the big one
        // (0.9/token), but trading one small file for the big one raises
        // the total value and still fits.
        let nodes = vec![
            node("big.rs", 900.0, 1000),
            node("s1.rs", 100.0, 100),
            node("s2.rs", 100.0, 100),
        ];
        let plan = select(&nodes, &paths(&["big.rs", "s1.rs", "s2.rs"]), Some(1100));
        assert!(plan.accepted.contains(&PathBuf::from("big.rs")));
        assert_eq!(plan.accepted.len(), 2);
        assert_eq!(plan.tokens_used, 1100);
    }

    #[test]
    fn accepted_keeps_sequence_order() {
        let nodes = vec![
            node("z.rs", 500.0, 100),
            node("a.rs", 400.0, 100),
            node("m.rs", 300.0, 100),
        ];
        // The orderer decided z, m, a.
        let plan = select(&nodes, &paths(&["z.rs", "m.rs", "a.rs"]), Some(1000));
        assert_eq!(plan.accepted, paths(&["z.rs", "m.rs", "a.rs"]));
    }

    #[test]
    fn infeasible_ceiling_rejects_everything() {
        let nodes = vec![node("a.rs", 500.0, 100)];
        let plan = select(&nodes, &paths(&["a.rs"]), Some(10));
        assert!(plan.accepted.is_empty());
        assert_eq!(plan.rejected.len(), 1);
        assert!(plan.infeasible);
        assert_eq!(plan.tokens_used, 0);
    }

    #[test]
    fn empty_input_is_a_valid_selection() {
        let plan = select(&[], &[], Some(100));
        assert!(plan.accepted.is_empty());
        assert!(plan.rejected.is_empty());
        assert!(!plan.infeasible);
    }

    #[test]
    fn zero_cost_files_are_always_admitted() {
        let nodes = vec![node("empty.rs", 1.0, 0), node("a.rs", 900.0, 100)];
        let plan = select(&nodes, &paths(&["empty.rs", "a.rs"]), Some(100));
        assert!(plan.accepted.contains(&PathBuf::from("empty.rs")));
        assert!(plan.accepted.contains(&PathBuf::from("a.rs")));
    }
}
