//! PageRank centrality over the file dependency graph.
//!
//! A file referenced by many well-referenced files scores high. The
//! computation is pure: same graph in, same ranks out.

use super::engine::DependencyGraph;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::trace;

/// Compute PageRank for every file in the graph.
///
/// Ranks start uniform at `1/N` and each round every file keeps a
/// `(1 - damping) / N` floor plus the damped share of rank flowing in from
/// its dependents, each of which splits its own rank evenly across its
/// outgoing edges. Iteration stops early once no rank moves by more than
/// `tolerance`. An empty graph yields an empty map.
pub fn page_rank(
    graph: &DependencyGraph,
    damping: f64,
    iterations: usize,
    tolerance: f64,
) -> HashMap<PathBuf, f64> {
    let mut files: Vec<&PathBuf> = graph.files().collect();
    files.sort();

    let n = files.len();
    if n == 0 {
        return HashMap::new();
    }

    let index: HashMap<&PathBuf, usize> = files
        .iter()
        .enumerate()
        .map(|(i, path)| (*path, i))
        .collect();

    // Precompute, for each file, who points at it and how many edges each
    // of those sources fans out to.
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut out_degree: Vec<usize> = vec![0; n];
    for (i, path) in files.iter().enumerate() {
        let deps = graph.dependencies(path);
        out_degree[i] = deps.len();
        for dep in deps {
            if let Some(&j) = index.get(dep) {
                incoming[j].push(i);
            }
        }
    }

    let uniform = 1.0 / n as f64;
    let mut ranks = vec![uniform; n];

    for round in 0..iterations {
        let mut next = vec![(1.0 - damping) * uniform; n];
        for (target, sources) in incoming.iter().enumerate() {
            for &source in sources {
                next[target] += damping * ranks[source] / out_degree[source] as f64;
            }
        }

        let max_delta = ranks
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        ranks = next;

        if max_delta < tolerance {
            trace!(round, "pagerank converged");
            break;
        }
    }

    files
        .into_iter()
        .zip(ranks)
        .map(|(path, rank)| (path.clone(), rank))
        .collect()
}
