//! Engine configuration: scoring weights, the path-heuristic rule table,
//! centrality constants, and the token budget.
//!
//! Everything here is passed explicitly into scoring calls — there is no
//! process-wide mutable state, so scans are deterministic and parallel-safe.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// How file content is rewritten before budgeting and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMode {
    /// Emit content verbatim.
    #[default]
    None,
    /// Strip comments and collapse blank lines.
    Strip,
    /// Replace function bodies with a placeholder, keeping signatures.
    Structural,
}

/// Weights applied when combining score components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Multiplier for the PageRank centrality score (raw range ~0.0–1.0).
    pub centrality: f64,
    /// Multiplier for normalized Shannon entropy (range 0.0–1.0).
    pub entropy: f64,
    /// Multiplier for the churn boost (already capped in points).
    pub churn: f64,
    /// Multiplier for the path-heuristic base score.
    pub heuristic: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        // Keeps the components on comparable point scales: heuristic
        // 100–1000, churn 0–200, centrality up to ~1000, entropy up to 60.
        Self {
            centrality: 1000.0,
            entropy: 60.0,
            churn: 1.0,
            heuristic: 1.0,
        }
    }
}

/// How a heuristic rule matches a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Case-insensitive match on the file name.
    FileNameEquals,
    /// Case-insensitive substring match on the whole path.
    PathContains,
    /// Case-insensitive suffix match on the file name.
    FileNameEndsWith,
}

/// One entry in the ordered path-heuristic table. First match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicRule {
    pub kind: RuleKind,
    pub pattern: String,
    pub score: f64,
}

impl HeuristicRule {
    fn new(kind: RuleKind, pattern: &str, score: f64) -> Self {
        Self {
            kind,
            pattern: pattern.to_string(),
            score,
        }
    }
}

/// Configuration for a single scan. Construct once, pass by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: ScoreWeights,
    /// Ordered table of path-pattern rules; first match supplies the base
    /// score. Paths matching nothing get `default_heuristic`.
    pub heuristic_rules: Vec<HeuristicRule>,
    pub default_heuristic: f64,
    /// Points subtracted per path component, preferring shallow files.
    pub depth_penalty: f64,
    /// PageRank damping factor.
    pub damping: f64,
    /// Maximum PageRank iterations.
    pub centrality_iterations: usize,
    /// Early-exit tolerance: stop when no score moves more than this.
    pub centrality_tolerance: f64,
    /// Points added per commit touching the file.
    pub churn_per_commit: f64,
    /// Cap on the total churn boost.
    pub churn_cap: f64,
    /// Hard token ceiling for selection. `None` admits everything.
    pub max_tokens: Option<usize>,
    pub compression: CompressionMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            heuristic_rules: default_heuristic_rules(),
            default_heuristic: 500.0,
            depth_penalty: 10.0,
            damping: 0.85,
            centrality_iterations: 20,
            centrality_tolerance: 1e-6,
            churn_per_commit: 5.0,
            churn_cap: 200.0,
            max_tokens: None,
            compression: CompressionMode::None,
        }
    }
}

impl EngineConfig {
    /// Stable hash of this configuration, used as half of the cache key.
    pub fn signature(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        format!("{:?}", self).hash(&mut hasher);
        hasher.finish()
    }
}

/// The default semantic ranking table:
/// documentation > manifests > entry points > core > default > util > tests.
fn default_heuristic_rules() -> Vec<HeuristicRule> {
    use RuleKind::*;
    vec![
        HeuristicRule::new(FileNameEquals, "readme.md", 1000.0),
        HeuristicRule::new(FileNameEquals, "readme.txt", 1000.0),
        HeuristicRule::new(FileNameEquals, "architecture.md", 900.0),
        HeuristicRule::new(FileNameEquals, "contributing.md", 900.0),
        HeuristicRule::new(FileNameEquals, "cargo.toml", 800.0),
        HeuristicRule::new(FileNameEquals, "package.json", 800.0),
        HeuristicRule::new(FileNameEquals, "go.mod", 800.0),
        HeuristicRule::new(FileNameEquals, "makefile", 800.0),
        HeuristicRule::new(FileNameEquals, "dockerfile", 800.0),
        HeuristicRule::new(FileNameEquals, "main.rs", 700.0),
        HeuristicRule::new(FileNameEquals, "lib.rs", 700.0),
        HeuristicRule::new(FileNameEquals, "index.js", 700.0),
        HeuristicRule::new(FileNameEquals, "main.go", 700.0),
        HeuristicRule::new(FileNameEndsWith, "_test.go", 100.0),
        HeuristicRule::new(FileNameEndsWith, ".test.ts", 100.0),
        HeuristicRule::new(FileNameEndsWith, ".spec.ts", 100.0),
        HeuristicRule::new(PathContains, "test", 100.0),
        HeuristicRule::new(PathContains, "spec", 100.0),
        HeuristicRule::new(PathContains, "bench", 100.0),
        HeuristicRule::new(PathContains, "core", 600.0),
        HeuristicRule::new(PathContains, "app", 600.0),
        HeuristicRule::new(PathContains, "model", 600.0),
        HeuristicRule::new(PathContains, "schema", 600.0),
        HeuristicRule::new(PathContains, "util", 400.0),
        HeuristicRule::new(PathContains, "common", 400.0),
        HeuristicRule::new(PathContains, "helper", 400.0),
    ]
}
