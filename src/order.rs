//! Dependency-respecting output ordering.
//!
//! Emits definitions before their users: a file becomes ready once every
//! file it references has been emitted. Among ready files the highest
//! combined score goes first, with lexical path order as the tie-break, so
//! the sequence is a pure function of scores and edges.

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::graph::DependencyGraph;
use crate::model::{FileNode, Notice};

/// The final sequence plus any cycle notices raised while producing it.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub sequence: Vec<PathBuf>,
    pub notices: Vec<Notice>,
}

/// Order all nodes topologically by their reference edges.
///
/// When a cycle blocks progress, the highest-scoring file on the cycle is
/// emitted anyway and a `CycleBroken` notice records the forced choice.
/// Files that merely depend on a cycle wait for it to unwind; only actual
/// cycle members are candidates for forced emission. Every input file
/// appears in the output exactly once.
pub fn order(nodes: &[FileNode], graph: &DependencyGraph) -> OrderResult {
    let scores: HashMap<&Path, f64> = nodes
        .iter()
        .map(|node| (node.path.as_path(), node.score.combined))
        .collect();

    // Unemitted dependency count per file. A file with zero is ready.
    let mut pending: HashMap<&Path, usize> = nodes
        .iter()
        .map(|node| (node.path.as_path(), graph.out_degree(&node.path)))
        .collect();

    let mut emitted: HashSet<&Path> = HashSet::with_capacity(nodes.len());
    let mut sequence = Vec::with_capacity(nodes.len());
    let mut notices = Vec::new();

    while emitted.len() < nodes.len() {
        let ready = pick(
            pending
                .iter()
                .filter(|(path, &count)| count == 0 && !emitted.contains(*path))
                .map(|(&path, _)| path),
            &scores,
        );

        let next = match ready {
            Some(path) => path,
            None => {
                // Nothing is ready, so a cycle is blocking progress. Force
                // the strongest cycle member out and let the rest unwind.
                let remaining: Vec<&Path> = pending
                    .keys()
                    .copied()
                    .filter(|path| !emitted.contains(path))
                    .collect();
                let cyclic = cycle_members(&remaining, graph);
                let candidates = if cyclic.is_empty() { remaining } else { cyclic };
                let forced = pick(candidates.into_iter(), &scores)
                    .expect("files remain when no file is ready");
                debug!(path = %forced.display(), "breaking dependency cycle");
                notices.push(Notice::CycleBroken {
                    path: forced.to_path_buf(),
                });
                forced
            }
        };

        emitted.insert(next);
        sequence.push(next.to_path_buf());
        for dependent in graph.dependents(next) {
            if let Some(count) = pending.get_mut(dependent.as_path()) {
                *count = count.saturating_sub(1);
            }
        }
    }

    OrderResult { sequence, notices }
}

/// Files that sit on a cycle within the still-unemitted subgraph: members
/// of a strongly connected component with more than one node. Self-edges
/// never enter the graph, so singleton components are always acyclic.
fn cycle_members<'a>(remaining: &[&'a Path], graph: &DependencyGraph) -> Vec<&'a Path> {
    let mut subgraph = DiGraph::<&Path, ()>::new();
    let mut index = HashMap::with_capacity(remaining.len());
    for &path in remaining {
        index.insert(path, subgraph.add_node(path));
    }
    for &path in remaining {
        for dep in graph.dependencies(path) {
            if let Some(&to) = index.get(dep.as_path()) {
                subgraph.add_edge(index[path], to, ());
            }
        }
    }

    tarjan_scc(&subgraph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .flatten()
        .map(|node| subgraph[node])
        .collect()
}

/// Highest combined score wins; equal scores fall back to lexical path
/// order.
fn pick<'a>(
    candidates: impl Iterator<Item = &'a Path>,
    scores: &HashMap<&Path, f64>,
) -> Option<&'a Path> {
    candidates.reduce(|best, candidate| {
        let best_score = scores.get(best).copied().unwrap_or_default();
        let candidate_score = scores.get(candidate).copied().unwrap_or_default();
        if candidate_score > best_score
            || (candidate_score == best_score && candidate < best)
        {
            candidate
        } else {
            best
        }
    })
}
