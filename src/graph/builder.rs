//! Graph builder — resolves extracted references to files in the catalog.
//!
//! Resolution is pure over the candidate set: no filesystem probing. A
//! reference that matches nothing in the set (an external crate, a stdlib
//! import, a vendored header) is dropped silently.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::engine::DependencyGraph;
use crate::extract::SupportedLanguage;
use crate::model::FileNode;

/// Build the file dependency graph for a set of extracted nodes.
///
/// Edges run from the referencing file to the file that defines what it
/// references. When several files could satisfy a reference, the lexically
/// first path wins, keeping resolution deterministic.
pub fn build_graph(nodes: &[FileNode], root: &Path) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for node in nodes {
        graph.add_file(node.path.clone());
    }

    let resolver = Resolver::new(nodes, root);
    let mut resolved = 0usize;
    for node in nodes {
        for reference in &node.references {
            if let Some(target) = resolver.resolve(node, reference) {
                graph.add_edge(&node.path, target);
                resolved += 1;
            }
        }
    }

    debug!(
        files = graph.node_count(),
        edges = graph.edge_count(),
        resolved,
        "reference resolution complete"
    );
    graph.log_summary();
    graph
}

struct Resolver<'a> {
    root: &'a Path,
    /// Root-relative path -> absolute catalog path.
    by_rel_path: HashMap<PathBuf, &'a Path>,
    /// Defined symbol -> defining file, lexically-first file wins.
    by_symbol: BTreeMap<&'a str, &'a Path>,
    /// File stem -> file, lexically-first wins.
    by_stem: BTreeMap<String, &'a Path>,
}

impl<'a> Resolver<'a> {
    fn new(nodes: &'a [FileNode], root: &'a Path) -> Self {
        let mut by_rel_path = HashMap::new();
        let mut by_symbol: BTreeMap<&str, &Path> = BTreeMap::new();
        let mut by_stem: BTreeMap<String, &Path> = BTreeMap::new();

        let mut sorted: Vec<&FileNode> = nodes.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        for node in sorted {
            let rel = node
                .path
                .strip_prefix(root)
                .unwrap_or(&node.path)
                .to_path_buf();
            by_rel_path.insert(rel, node.path.as_path());

            for symbol in &node.defines {
                by_symbol.entry(symbol).or_insert(node.path.as_path());
            }
            if let Some(stem) = node.path.file_stem().and_then(|s| s.to_str()) {
                by_stem
                    .entry(stem.to_string())
                    .or_insert(node.path.as_path());
            }
        }

        Self {
            root,
            by_rel_path,
            by_symbol,
            by_stem,
        }
    }

    fn resolve(&self, from: &FileNode, reference: &str) -> Option<&'a Path> {
        if reference.starts_with("./") || reference.starts_with("../") {
            return self.resolve_relative(from, reference);
        }
        if let Some(path) = reference.strip_prefix("crate::") {
            return self.resolve_rust_path(path);
        }
        match from.language {
            Some(SupportedLanguage::Python) => {
                if let Some(target) = self.resolve_python_module(from, reference) {
                    return Some(target);
                }
            }
            Some(SupportedLanguage::Rust) => {
                // Bare `mod name;` references point at a sibling file.
                if !reference.contains("::") {
                    if let Some(target) = self.resolve_rust_sibling(from, reference) {
                        return Some(target);
                    }
                }
            }
            Some(SupportedLanguage::Cpp) => {
                // Quoted includes resolve next to the including file first.
                if let Some(target) = self.resolve_relative(from, reference) {
                    return Some(target);
                }
                if let Some(&target) = self.by_rel_path.get(Path::new(reference)) {
                    return Some(target);
                }
            }
            _ => {}
        }

        // Last resort: a file in the set defines this exact symbol, or the
        // reference's final segment names a file stem.
        let tail = reference
            .rsplit(|c| c == ':' || c == '.' || c == '/')
            .next()
            .unwrap_or(reference);
        if let Some(&target) = self.by_symbol.get(reference) {
            return Some(target);
        }
        if let Some(&target) = self.by_symbol.get(tail) {
            return Some(target);
        }
        self.by_stem.get(tail).copied()
    }

    /// `./db` from `web/app.js` -> `web/db.js`, trying common extensions
    /// and index files.
    fn resolve_relative(&self, from: &FileNode, reference: &str) -> Option<&'a Path> {
        let from_rel = from.path.strip_prefix(self.root).unwrap_or(&from.path);
        let base = from_rel.parent().unwrap_or(Path::new(""));
        let joined = normalize(&base.join(reference));

        if let Some(&target) = self.by_rel_path.get(&joined) {
            return Some(target);
        }
        const EXTENSIONS: &[&str] = &["js", "ts", "tsx", "jsx", "mjs", "py", "rs"];
        for ext in EXTENSIONS {
            let mut candidate = joined.clone().into_os_string();
            candidate.push(format!(".{ext}"));
            if let Some(&target) = self.by_rel_path.get(Path::new(&candidate)) {
                return Some(target);
            }
        }
        for index in ["index.js", "index.ts", "index.tsx"] {
            if let Some(&target) = self.by_rel_path.get(&joined.join(index)) {
                return Some(target);
            }
        }
        None
    }

    /// `crate::graph::engine` -> `src/graph/engine.rs` or
    /// `src/graph/engine/mod.rs`.
    fn resolve_rust_path(&self, path: &str) -> Option<&'a Path> {
        let relative: PathBuf = path.split("::").collect();
        let module = Path::new("src").join(&relative);

        let mut as_file = module.clone().into_os_string();
        as_file.push(".rs");
        if let Some(&target) = self.by_rel_path.get(Path::new(&as_file)) {
            return Some(target);
        }
        self.by_rel_path.get(&module.join("mod.rs")).copied()
    }

    fn resolve_rust_sibling(&self, from: &FileNode, name: &str) -> Option<&'a Path> {
        let from_rel = from.path.strip_prefix(self.root).unwrap_or(&from.path);
        let dir = from_rel.parent().unwrap_or(Path::new(""));

        let as_file = dir.join(format!("{name}.rs"));
        if let Some(&target) = self.by_rel_path.get(&as_file) {
            return Some(target);
        }
        self.by_rel_path.get(&dir.join(name).join("mod.rs")).copied()
    }

    /// `pkg.module` -> `pkg/module.py` or `pkg/module/__init__.py`, tried
    /// from the root and then beside the importing file.
    fn resolve_python_module(&self, from: &FileNode, reference: &str) -> Option<&'a Path> {
        let relative: PathBuf = reference.split('.').collect();
        let from_rel = from.path.strip_prefix(self.root).unwrap_or(&from.path);
        let sibling_base = from_rel.parent().unwrap_or(Path::new("")).join(&relative);

        for base in [relative, sibling_base] {
            let mut as_file = base.clone().into_os_string();
            as_file.push(".py");
            if let Some(&target) = self.by_rel_path.get(Path::new(&as_file)) {
                return Some(target);
            }
            if let Some(&target) = self.by_rel_path.get(&base.join("__init__.py")) {
                return Some(target);
            }
        }
        None
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else {
                    parts.push(component);
                }
            }
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoreComponents;
    use std::collections::BTreeSet;

    fn node(path: &str, language: Option<SupportedLanguage>) -> FileNode {
        FileNode {
            path: PathBuf::from(path),
            content: String::new(),
            size: 0,
            language,
            defines: BTreeSet::new(),
            references: BTreeSet::new(),
            degraded: false,
            tokens: 0,
            score: ScoreComponents::default(),
            compressed: None,
        }
    }

    #[test]
    fn rust_crate_paths_resolve() {
        let mut main = node("src/main.rs", Some(SupportedLanguage::Rust));
        main.references.insert("crate::util".to_string());
        let util = node("src/util.rs", Some(SupportedLanguage::Rust));

        let graph = build_graph(&[main, util], Path::new(""));
        assert_eq!(
            graph.dependencies(Path::new("src/main.rs")),
            vec![&PathBuf::from("src/util.rs")]
        );
    }

    #[test]
    fn rust_mod_declarations_resolve_to_siblings() {
        let mut lib = node("src/lib.rs", Some(SupportedLanguage::Rust));
        lib.references.insert("rank".to_string());
        lib.references.insert("graph".to_string());
        let rank = node("src/rank.rs", Some(SupportedLanguage::Rust));
        let graph_mod = node("src/graph/mod.rs", Some(SupportedLanguage::Rust));

        let graph = build_graph(&[lib, rank, graph_mod], Path::new(""));
        let deps = graph.dependencies(Path::new("src/lib.rs"));
        assert_eq!(deps.len(), 2);
    }

    #[test]
    fn js_relative_imports_resolve() {
        let mut app = node("web/app.js", Some(SupportedLanguage::JavaScript));
        app.references.insert("./db".to_string());
        app.references.insert("../shared/types".to_string());
        app.references.insert("react".to_string());
        let db = node("web/db.js", Some(SupportedLanguage::JavaScript));
        let types = node("shared/types.ts", Some(SupportedLanguage::TypeScript));

        let graph = build_graph(&[app, db, types], Path::new(""));
        let deps = graph.dependencies(Path::new("web/app.js"));
        assert_eq!(deps.len(), 2, "react must stay unresolved: {deps:?}");
    }

    #[test]
    fn python_dotted_imports_resolve() {
        let mut views = node("app/views.py", Some(SupportedLanguage::Python));
        views.references.insert("app.models".to_string());
        views.references.insert("os".to_string());
        let models = node("app/models.py", Some(SupportedLanguage::Python));

        let graph = build_graph(&[views, models], Path::new(""));
        assert_eq!(
            graph.dependencies(Path::new("app/views.py")),
            vec![&PathBuf::from("app/models.py")]
        );
    }

    #[test]
    fn symbol_index_prefers_lexically_first_definer() {
        let mut user = node("zz_user.py", Some(SupportedLanguage::Python));
        user.references.insert("helper".to_string());
        let mut a = node("a.py", Some(SupportedLanguage::Python));
        a.defines.insert("helper".to_string());
        let mut b = node("b.py", Some(SupportedLanguage::Python));
        b.defines.insert("helper".to_string());

        let graph = build_graph(&[user, a, b], Path::new(""));
        assert_eq!(
            graph.dependencies(Path::new("zz_user.py")),
            vec![&PathBuf::from("a.py")]
        );
    }

    #[test]
    fn unresolved_references_produce_no_edges() {
        let mut main = node("src/main.rs", Some(SupportedLanguage::Rust));
        main.references
            .insert("std::collections::HashMap".to_string());
        main.references.insert("serde".to_string());

        let graph = build_graph(&[main], Path::new(""));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn quoted_includes_resolve_beside_the_includer() {
        let mut main = node("core/main.cpp", Some(SupportedLanguage::Cpp));
        main.references.insert("config.h".to_string());
        main.references.insert("vector".to_string());
        let config = node("core/config.h", Some(SupportedLanguage::Cpp));

        let graph = build_graph(&[main, config], Path::new(""));
        assert_eq!(
            graph.dependencies(Path::new("core/main.cpp")),
            vec![&PathBuf::from("core/config.h")]
        );
    }

    #[test]
    fn normalize_collapses_parent_components() {
        assert_eq!(
            normalize(Path::new("web/admin/../shared/types")),
            PathBuf::from("web/shared/types")
        );
        assert_eq!(normalize(Path::new("./a/b")), PathBuf::from("a/b"));
    }
}
