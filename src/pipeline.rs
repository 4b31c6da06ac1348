//! The scan pipeline: extraction through budgeting, in stage order.
//!
//! Per-file work (extraction, entropy, token counting, compression) runs in
//! parallel with rayon; the graph, ordering, and budget stages are
//! sequential over the collected results, so output never depends on thread
//! scheduling.

use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::budget;
use crate::cache::{CacheEntry, CacheKey, CacheProvider};
use crate::catalog::SourceCatalog;
use crate::compress;
use crate::config::{CompressionMode, EngineConfig};
use crate::error::{Error, Result};
use crate::extract;
use crate::git::GitMetadataProvider;
use crate::graph;
use crate::model::{
    CompressedVariant, ContextPlan, FileNode, Notice, PlannedFile, ScoreComponents,
};
use crate::order;
use crate::rank;
use crate::tokens::TokenCounter;

/// Cooperative cancellation flag, checked between pipeline stages. Cloning
/// shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The context compiler. Holds the configuration and the collaborator
/// seams; `run` turns one catalog into one plan.
pub struct Engine<'a> {
    config: &'a EngineConfig,
    git: &'a dyn GitMetadataProvider,
    counter: &'a dyn TokenCounter,
    cache: &'a dyn CacheProvider,
}

impl<'a> Engine<'a> {
    pub fn new(
        config: &'a EngineConfig,
        git: &'a dyn GitMetadataProvider,
        counter: &'a dyn TokenCounter,
        cache: &'a dyn CacheProvider,
    ) -> Self {
        Self {
            config,
            git,
            counter,
            cache,
        }
    }

    /// Run the full pipeline over a catalog.
    ///
    /// The plan is a pure function of the catalog contents, the
    /// configuration, and the collaborator answers: same inputs, same plan,
    /// regardless of thread count or cache temperature.
    pub fn run(&self, catalog: &SourceCatalog, cancel: &CancelToken) -> Result<ContextPlan> {
        info!(files = catalog.file_count(), root = %catalog.root.display(), "scan started");
        self.checkpoint(cancel)?;

        // Stage 1: per-file analysis, parallel.
        let config_hash = self.config.signature();
        let mut nodes: Vec<FileNode> = catalog
            .files
            .par_iter()
            .map(|file| self.analyze(file, &catalog.root, config_hash, cancel))
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        self.checkpoint(cancel)?;

        let mut notices: Vec<Notice> = nodes
            .iter()
            .filter(|node| node.degraded)
            .map(|node| Notice::ExtractionDegraded {
                path: node.path.clone(),
            })
            .collect();

        // Stage 2: dependency graph and centrality.
        let graph = graph::build_graph(&nodes, &catalog.root);
        let ranks = graph::page_rank(
            &graph,
            self.config.damping,
            self.config.centrality_iterations,
            self.config.centrality_tolerance,
        );
        for node in &mut nodes {
            let centrality = ranks.get(&node.path).copied().unwrap_or_default();
            node.score = rank::combine(
                centrality,
                node.score.entropy,
                node.score.churn,
                node.score.heuristic,
                &self.config.weights,
            );
        }
        self.checkpoint(cancel)?;

        // Stage 3: ordering.
        let ordered = order::order(&nodes, &graph);
        notices.extend(ordered.notices);
        self.checkpoint(cancel)?;

        // Stage 4: budget selection.
        let plan = budget::select(&nodes, &ordered.sequence, self.config.max_tokens);
        if plan.infeasible {
            notices.push(Notice::BudgetInfeasible);
        }

        let files = plan
            .accepted
            .iter()
            .filter_map(|path| nodes.iter().find(|node| &node.path == path))
            .map(|node| PlannedFile {
                path: node.path.clone(),
                content: node.effective_content().to_string(),
                score: node.score,
                tokens: node.effective_tokens(),
            })
            .collect::<Vec<_>>();

        info!(
            selected = files.len(),
            rejected = plan.rejected.len(),
            tokens = plan.tokens_used,
            "scan complete"
        );
        Ok(ContextPlan {
            files,
            rejected: plan.rejected,
            notices,
            total_tokens: plan.tokens_used,
        })
    }

    /// Stage 1 body: extraction, scoring inputs, token counting, and
    /// compression for one file. Centrality is filled in later.
    ///
    /// Cancellation is consulted per file: once the token is raised,
    /// files not yet started are skipped with an empty placeholder and the
    /// post-stage checkpoint discards the whole batch.
    fn analyze(
        &self,
        file: &crate::catalog::CatalogFile,
        root: &Path,
        config_hash: u64,
        cancel: &CancelToken,
    ) -> FileNode {
        if cancel.is_cancelled() {
            return FileNode {
                path: file.path.clone(),
                content: String::new(),
                size: file.size,
                language: file.language,
                defines: Default::default(),
                references: Default::default(),
                degraded: false,
                tokens: 0,
                score: ScoreComponents::default(),
                compressed: None,
            };
        }

        let rel_path = file.path.strip_prefix(root).unwrap_or(&file.path);
        let extraction = extract::extract(&file.content, file.language);

        let (tokens, compressed) = match self.cache.get(&CacheKey::new(&file.content, config_hash)) {
            Some(entry) => {
                debug!(path = %rel_path.display(), "cache hit");
                let compressed = entry.compressed.map(|text| CompressedVariant {
                    tokens: self.counter.count(&text),
                    text,
                });
                (entry.tokens, compressed)
            }
            None => {
                let tokens = self.counter.count(&file.content);
                let compressed = match self.config.compression {
                    CompressionMode::None => None,
                    mode => {
                        let text = compress::compress(&file.content, file.language, mode);
                        Some(CompressedVariant {
                            tokens: self.counter.count(&text),
                            text,
                        })
                    }
                };
                self.cache.put(
                    CacheKey::new(&file.content, config_hash),
                    CacheEntry {
                        tokens,
                        compressed: compressed.as_ref().map(|c| c.text.clone()),
                    },
                );
                (tokens, compressed)
            }
        };

        let entropy = rank::shannon_entropy(&file.content);
        let heuristic = rank::heuristic_score(rel_path, self.config);
        let activity = self.git.activity(rel_path);
        let churn = rank::churn_score(activity.as_ref(), self.config);

        FileNode {
            path: file.path.clone(),
            content: file.content.clone(),
            size: file.size,
            language: file.language,
            defines: extraction.defines,
            references: extraction.references,
            degraded: extraction.degraded,
            tokens,
            score: rank::combine(0.0, entropy, churn, heuristic, &self.config.weights),
            compressed,
        }
    }

    fn checkpoint(&self, cancel: &CancelToken) -> Result<()> {
        if cancel.is_cancelled() {
            debug!("scan cancelled between stages");
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoCache;
    use crate::git::NoGitMetadata;
    use crate::tokens::HeuristicTokenCounter;

    #[test]
    fn cancelled_token_aborts_before_work() {
        let config = EngineConfig::default();
        let engine = Engine::new(&config, &NoGitMetadata, &HeuristicTokenCounter, &NoCache);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = engine.run(&SourceCatalog::default(), &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn empty_catalog_yields_empty_plan() {
        let config = EngineConfig::default();
        let engine = Engine::new(&config, &NoGitMetadata, &HeuristicTokenCounter, &NoCache);

        let plan = engine
            .run(&SourceCatalog::default(), &CancelToken::new())
            .expect("empty scan should succeed");
        assert!(plan.files.is_empty());
        assert!(plan.rejected.is_empty());
        assert_eq!(plan.total_tokens, 0);
    }
}
