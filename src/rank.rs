//! Relevance scoring: entropy, path heuristics, churn, and the weighted
//! combination with graph centrality.
//!
//! Every function here is pure. Centrality comes from
//! `graph::page_rank` and is combined with the rest in `combine`.

use std::path::Path;

use crate::config::{EngineConfig, RuleKind, ScoreWeights};
use crate::git::GitActivity;
use crate::model::ScoreComponents;

/// Normalized Shannon entropy of the content bytes, in `[0, 1]`.
///
/// Low-entropy files (lock files, generated tables, long runs of repeated
/// text) carry little information per token and score near zero; dense
/// prose and code land in the middle of the range. Empty content is zero.
pub fn shannon_entropy(content: &str) -> f64 {
    let bytes = content.as_bytes();
    if bytes.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for &byte in bytes {
        counts[byte as usize] += 1;
    }

    let len = bytes.len() as f64;
    let raw: f64 = counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum();

    // A byte holds at most 8 bits.
    raw / 8.0
}

/// Base relevance from the path alone: first matching rule in the table
/// wins, otherwise the default, then a penalty per directory level so
/// shallow files edge out deeply nested ones.
pub fn heuristic_score(rel_path: &Path, config: &EngineConfig) -> f64 {
    let path_lower = rel_path.to_string_lossy().to_lowercase();
    let name_lower = rel_path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let base = config
        .heuristic_rules
        .iter()
        .find(|rule| {
            let pattern = rule.pattern.to_lowercase();
            match rule.kind {
                RuleKind::FileNameEquals => name_lower == pattern,
                RuleKind::FileNameEndsWith => name_lower.ends_with(&pattern),
                RuleKind::PathContains => path_lower.contains(&pattern),
            }
        })
        .map(|rule| rule.score)
        .unwrap_or(config.default_heuristic);

    let depth = rel_path.components().count().saturating_sub(1) as f64;
    base - depth * config.depth_penalty
}

/// Churn boost: points per commit, capped, scaled by how recently the file
/// was touched. Files without history contribute nothing.
pub fn churn_score(activity: Option<&GitActivity>, config: &EngineConfig) -> f64 {
    match activity {
        Some(activity) => {
            let raw = (activity.commit_count as f64 * config.churn_per_commit)
                .min(config.churn_cap);
            raw * activity.recency.weight()
        }
        None => 0.0,
    }
}

/// Weighted combination of the four sub-scores.
pub fn combine(
    centrality: f64,
    entropy: f64,
    churn: f64,
    heuristic: f64,
    weights: &ScoreWeights,
) -> ScoreComponents {
    ScoreComponents {
        centrality,
        entropy,
        churn,
        heuristic,
        combined: centrality * weights.centrality
            + entropy * weights.entropy
            + churn * weights.churn
            + heuristic * weights.heuristic,
    }
}
