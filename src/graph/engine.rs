//! The file dependency graph.
//!
//! Uses petgraph to store reference edges between files and provides the
//! query surface the scorer and orderer traverse.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directed graph over file paths. An edge `A -> B` means A references a
/// symbol or module that B defines, so B should appear before A in any
/// dependency-respecting ordering.
pub struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    /// Index: file path -> node index.
    path_index: HashMap<PathBuf, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            path_index: HashMap::new(),
        }
    }

    /// Add a file node. Idempotent: re-adding returns the existing index.
    pub fn add_file(&mut self, path: PathBuf) -> NodeIndex {
        if let Some(&idx) = self.path_index.get(&path) {
            return idx;
        }
        let idx = self.graph.add_node(path.clone());
        self.path_index.insert(path, idx);
        idx
    }

    /// Add a reference edge. Self-edges and duplicates are dropped.
    pub fn add_edge(&mut self, from: &Path, to: &Path) {
        if from == to {
            return;
        }
        let (from_idx, to_idx) = match (self.path_index.get(from), self.path_index.get(to)) {
            (Some(&f), Some(&t)) => (f, t),
            _ => return,
        };
        if self.graph.find_edge(from_idx, to_idx).is_none() {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.path_index.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All file paths in the graph.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.graph.node_weights()
    }

    /// Files that `path` references (its outgoing edges).
    pub fn dependencies(&self, path: &Path) -> Vec<&PathBuf> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Files that reference `path` (its incoming edges).
    pub fn dependents(&self, path: &Path) -> Vec<&PathBuf> {
        self.neighbors(path, Direction::Incoming)
    }

    pub fn out_degree(&self, path: &Path) -> usize {
        self.degree(path, Direction::Outgoing)
    }

    pub fn in_degree(&self, path: &Path) -> usize {
        self.degree(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &Path, direction: Direction) -> Vec<&PathBuf> {
        match self.path_index.get(path) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    fn degree(&self, path: &Path, direction: Direction) -> usize {
        match self.path_index.get(path) {
            Some(&idx) => self.graph.neighbors_directed(idx, direction).count(),
            None => 0,
        }
    }

    pub(crate) fn log_summary(&self) {
        debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "dependency graph assembled"
        );
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.dependencies(Path::new("missing.rs")).is_empty());
    }

    #[test]
    fn add_file_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_file(p("src/main.rs"));
        let b = graph.add_file(p("src/main.rs"));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn self_edges_are_dropped() {
        let mut graph = DependencyGraph::new();
        graph.add_file(p("src/main.rs"));
        graph.add_edge(Path::new("src/main.rs"), Path::new("src/main.rs"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_edges_are_dropped() {
        let mut graph = DependencyGraph::new();
        graph.add_file(p("src/main.rs"));
        graph.add_file(p("src/lib.rs"));
        graph.add_edge(Path::new("src/main.rs"), Path::new("src/lib.rs"));
        graph.add_edge(Path::new("src/main.rs"), Path::new("src/lib.rs"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn dependents_mirror_dependencies() {
        let mut graph = DependencyGraph::new();
        graph.add_file(p("src/main.rs"));
        graph.add_file(p("src/util.rs"));
        graph.add_edge(Path::new("src/main.rs"), Path::new("src/util.rs"));

        assert_eq!(
            graph.dependencies(Path::new("src/main.rs")),
            vec![&p("src/util.rs")]
        );
        assert_eq!(
            graph.dependents(Path::new("src/util.rs")),
            vec![&p("src/main.rs")]
        );
        assert_eq!(graph.in_degree(Path::new("src/util.rs")), 1);
        assert_eq!(graph.out_degree(Path::new("src/util.rs")), 0);
    }

    #[test]
    fn edges_to_unknown_files_are_ignored() {
        let mut graph = DependencyGraph::new();
        graph.add_file(p("src/main.rs"));
        graph.add_edge(Path::new("src/main.rs"), Path::new("src/ghost.rs"));
        assert_eq!(graph.edge_count(), 0);
    }
}
