//! # Strata
//!
//! Context compiler for LLMs: turn a source tree into a ranked, ordered,
//! budgeted context artifact.
//!
//! Strata scans a codebase, extracts what each file defines and references,
//! builds the file dependency graph, scores every file by centrality,
//! information density, churn, and path heuristics, then emits the files in
//! dependency order under a token budget — optionally compressed down to
//! signatures.
//!
//! ## Key Features
//!
//! - **Graph-ranked**: PageRank over real reference edges, not just paths
//! - **Budget-aware**: greedy knapsack with an exchange pass, never over
//! - **Dependency-ordered**: definitions come before their users
//! - **Multi-language**: Rust, Python, JavaScript, TypeScript, Go, Java, C++
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strata::{scan_dir, CancelToken, Engine, EngineConfig};
//! use strata::{HeuristicTokenCounter, NoCache, NoGitMetadata};
//! use std::path::Path;
//!
//! let catalog = scan_dir(Path::new("."))?;
//! let config = EngineConfig {
//!     max_tokens: Some(8_000),
//!     ..EngineConfig::default()
//! };
//! let engine = Engine::new(&config, &NoGitMetadata, &HeuristicTokenCounter, &NoCache);
//! let plan = engine.run(&catalog, &CancelToken::new())?;
//!
//! for file in &plan.files {
//!     println!("{} ({} tokens)", file.path.display(), file.tokens);
//! }
//! # Ok::<(), strata::Error>(())
//! ```

pub mod budget;
pub mod cache;
pub mod catalog;
pub mod compress;
pub mod config;
pub mod error;
pub mod extract;
pub mod git;
pub mod graph;
pub mod model;
pub mod order;
pub mod pipeline;
pub mod rank;
pub mod tokens;

// Re-exports for convenience
pub use error::{Error, Result};

pub use cache::{CacheEntry, CacheKey, CacheProvider, MemoryCache, NoCache};
pub use catalog::{scan_dir, CatalogFile, SourceCatalog};
pub use config::{CompressionMode, EngineConfig, HeuristicRule, RuleKind, ScoreWeights};
pub use extract::SupportedLanguage;
pub use git::{GitActivity, GitMetadataProvider, MapGitMetadata, NoGitMetadata, RecencyBucket};
pub use graph::{build_graph, page_rank, DependencyGraph};
pub use model::{
    ContextPlan, FileNode, Notice, PlannedFile, RejectReason, Rejection, ScoreComponents,
};
pub use pipeline::{CancelToken, Engine};
pub use tokens::{HeuristicTokenCounter, TokenCounter};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(path: &str, content: &str) -> CatalogFile {
        CatalogFile {
            path: PathBuf::from(path),
            content: content.to_string(),
            size: content.len() as u64,
            modified: None,
            language: SupportedLanguage::from_path(std::path::Path::new(path)),
        }
    }

    fn catalog(files: Vec<CatalogFile>) -> SourceCatalog {
        SourceCatalog {
            root: PathBuf::new(),
            files,
        }
    }

    fn run(config: &EngineConfig, catalog: &SourceCatalog) -> ContextPlan {
        let engine = Engine::new(config, &NoGitMetadata, &HeuristicTokenCounter, &NoCache);
        engine
            .run(catalog, &CancelToken::new())
            .expect("scan should succeed")
    }

    fn position(plan: &ContextPlan, path: &str) -> usize {
        plan.files
            .iter()
            .position(|f| f.path == PathBuf::from(path))
            .unwrap_or_else(|| panic!("{path} missing from plan"))
    }

    #[test]
    fn definitions_are_emitted_before_their_users() {
        let catalog = catalog(vec![
            file(
                "src/main.rs",
                "mod util;\n\nfn main() {\n    util::run();\n}\n",
            ),
            file("src/util.rs", "pub fn run() {}\n"),
        ]);

        let plan = run(&EngineConfig::default(), &catalog);
        assert_eq!(plan.files.len(), 2);
        assert!(position(&plan, "src/util.rs") < position(&plan, "src/main.rs"));
    }

    #[test]
    fn referenced_files_gain_centrality() {
        let shared = "pub fn shared() {}\n";
        let user = "use crate::core;\n\npub fn go() { core::shared(); }\n";
        let catalog = catalog(vec![
            file("src/core.rs", shared),
            file("src/a.rs", user),
            file("src/b.rs", user),
            file("src/c.rs", user),
        ]);

        let plan = run(&EngineConfig::default(), &catalog);
        let core = plan
            .files
            .iter()
            .find(|f| f.path == PathBuf::from("src/core.rs"))
            .expect("core should be planned");
        let leaf = plan
            .files
            .iter()
            .find(|f| f.path == PathBuf::from("src/a.rs"))
            .expect("a should be planned");
        assert!(core.score.centrality > leaf.score.centrality);
    }

    #[test]
    fn budget_is_respected_and_rejections_reported() {
        let body = "pub fn filler() { let x = 1; let y = 2; let z = x + y; }\n".repeat(20);
        let catalog = catalog(vec![
            file("src/a.rs", &body),
            file("src/b.rs", &body),
            file("src/c.rs", &body),
        ]);

        let one_file = HeuristicTokenCounter.count(&body);
        let config = EngineConfig {
            max_tokens: Some(one_file + one_file / 2),
            ..EngineConfig::default()
        };

        let plan = run(&config, &catalog);
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.rejected.len(), 2);
        assert!(plan.total_tokens <= one_file + one_file / 2);
        assert!(plan
            .rejected
            .iter()
            .all(|r| r.reason == RejectReason::ExceededBudget));
    }

    #[test]
    fn plans_are_deterministic() {
        let catalog = catalog(vec![
            file("src/main.rs", "mod a;\nmod b;\nfn main() {}\n"),
            file("src/a.rs", "pub fn a() {}\n"),
            file("src/b.rs", "pub fn b() {}\n"),
        ]);

        let config = EngineConfig::default();
        let first = run(&config, &catalog);
        let second = run(&config, &catalog);
        let paths = |plan: &ContextPlan| plan.files.iter().map(|f| f.path.clone()).collect::<Vec<_>>();
        assert_eq!(paths(&first), paths(&second));
        assert_eq!(first.total_tokens, second.total_tokens);
    }

    #[test]
    fn compression_shrinks_planned_content() {
        let source = "pub fn long_function() {\n    let a = 1;\n    let b = 2;\n    let c = a + b;\n    println!(\"{c}\");\n}\n";
        let catalog = catalog(vec![file("src/big.rs", source)]);

        let config = EngineConfig {
            compression: CompressionMode::Structural,
            ..EngineConfig::default()
        };
        let plan = run(&config, &catalog);
        assert_eq!(plan.files.len(), 1);
        assert!(plan.files[0].content.contains("pub fn long_function()"));
        assert!(plan.files[0].content.len() < source.len());
    }

    #[test]
    fn warm_cache_matches_cold_cache() {
        let catalog = catalog(vec![
            file("src/main.rs", "mod a;\nfn main() {}\n"),
            file("src/a.rs", "pub fn a() { let value = 40 + 2; }\n"),
        ]);
        let config = EngineConfig::default();
        let cache = MemoryCache::new();

        let engine = Engine::new(&config, &NoGitMetadata, &HeuristicTokenCounter, &cache);
        let cold = engine
            .run(&catalog, &CancelToken::new())
            .expect("cold run should succeed");
        assert!(!cache.is_empty());
        let warm = engine
            .run(&catalog, &CancelToken::new())
            .expect("warm run should succeed");

        assert_eq!(cold.total_tokens, warm.total_tokens);
        assert_eq!(cold.files.len(), warm.files.len());
    }
}
