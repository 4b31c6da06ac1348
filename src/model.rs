//! Core data model shared across the pipeline stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::extract::SupportedLanguage;

/// Everything the engine knows about one candidate file.
///
/// Created once per scan from the catalog; extraction and scoring fill the
/// derived fields in. Compression produces `compressed` as a separate
/// variant — `content` always keeps the original bytes for renderers that
/// need full fidelity.
#[derive(Debug, Clone)]
pub struct FileNode {
    pub path: PathBuf,
    pub content: String,
    pub size: u64,
    pub language: Option<SupportedLanguage>,
    /// Top-level symbols this file defines.
    pub defines: BTreeSet<String>,
    /// External modules/paths this file references.
    pub references: BTreeSet<String>,
    /// Structural extraction failed and the regex fallback was used.
    pub degraded: bool,
    /// Token cost of `content`.
    pub tokens: usize,
    pub score: ScoreComponents,
    pub compressed: Option<CompressedVariant>,
}

impl FileNode {
    /// Token cost the budget selector should weigh: the compressed cost when
    /// a compressed variant exists, the raw cost otherwise.
    pub fn effective_tokens(&self) -> usize {
        self.compressed.as_ref().map_or(self.tokens, |c| c.tokens)
    }

    /// Text a renderer should emit for this file.
    pub fn effective_content(&self) -> &str {
        self.compressed
            .as_ref()
            .map_or(self.content.as_str(), |c| c.text.as_str())
    }
}

/// A compression result derived from a `FileNode`, never mutating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedVariant {
    pub text: String,
    pub tokens: usize,
}

/// The four weighted sub-scores plus their combination. Pure derived data —
/// recomputable from the node, the graph, and the git metadata.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub centrality: f64,
    /// Normalized Shannon entropy in [0, 1].
    pub entropy: f64,
    pub churn: f64,
    pub heuristic: f64,
    /// Weighted sum of the four components.
    pub combined: f64,
}

/// Why a file was left out of the final selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    ExceededBudget,
}

/// A file rejected by the budget selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rejection {
    pub path: PathBuf,
    pub reason: RejectReason,
}

/// Non-fatal conditions surfaced to the caller alongside the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Notice {
    /// Structural parsing failed; the regex fallback was used.
    ExtractionDegraded { path: PathBuf },
    /// A dependency cycle was broken by emitting this file first.
    CycleBroken { path: PathBuf },
    /// The ceiling was smaller than the smallest candidate file.
    BudgetInfeasible,
}

/// One entry of the final ordered plan, ready for a renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedFile {
    pub path: PathBuf,
    /// Possibly compressed content.
    pub content: String,
    pub score: ScoreComponents,
    pub tokens: usize,
}

/// The engine's output: the ordered, budgeted selection plus everything a
/// renderer needs to report on what was left out.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContextPlan {
    pub files: Vec<PlannedFile>,
    pub rejected: Vec<Rejection>,
    pub notices: Vec<Notice>,
    pub total_tokens: usize,
}
