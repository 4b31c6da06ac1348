//! File dependency graph: construction, queries, and centrality.

pub mod builder;
pub mod centrality;
pub mod engine;

pub use builder::build_graph;
pub use centrality::page_rank;
pub use engine::DependencyGraph;
