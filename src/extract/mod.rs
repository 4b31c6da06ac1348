//! Reference extraction — per file, the set of top-level symbols it defines
//! and the set of external modules it references.
//!
//! One structural extractor per supported language walks the syntax tree
//! directly; everything else (and any structural parse failure) goes through
//! the regex fallback. Identical input bytes always yield identical output:
//! both sets are ordered.

pub mod cpp;
pub mod fallback;
pub mod go;
pub mod java;
pub mod javascript;
pub mod language;
pub mod python;
pub mod rust;

pub use language::SupportedLanguage;

use std::collections::BTreeSet;
use tree_sitter::{Node, Parser, Tree};

/// What one file defines and references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Top-level symbols defined in this file.
    pub defines: BTreeSet<String>,
    /// External modules/paths referenced by this file.
    pub references: BTreeSet<String>,
    /// True when structural parsing failed and the regex fallback ran.
    pub degraded: bool,
}

/// Capability interface for one extraction strategy.
///
/// `None` means the strategy could not process the content at all (grammar
/// failed to load or the parser gave up) — the caller degrades to the
/// fallback. Partial trees with error nodes still produce `Some`.
pub trait ReferenceExtractor: Sync {
    fn extract(&self, content: &str) -> Option<Extraction>;
}

/// Select the structural extractor for a language tag.
fn structural_extractor(language: SupportedLanguage) -> Box<dyn ReferenceExtractor> {
    match language {
        SupportedLanguage::Rust => Box::new(rust::RustExtractor),
        SupportedLanguage::Python => Box::new(python::PythonExtractor),
        SupportedLanguage::JavaScript => Box::new(javascript::JsExtractor::javascript()),
        SupportedLanguage::TypeScript => Box::new(javascript::JsExtractor::typescript()),
        SupportedLanguage::Tsx => Box::new(javascript::JsExtractor::tsx()),
        SupportedLanguage::Go => Box::new(go::GoExtractor),
        SupportedLanguage::Java => Box::new(java::JavaExtractor),
        SupportedLanguage::Cpp => Box::new(cpp::CppExtractor),
    }
}

/// Extract defines/references for a file.
///
/// Supported languages parse structurally and degrade to the regex fallback
/// on parser failure (`degraded = true`). Unsupported languages use the
/// fallback by contract, which is not a degradation.
pub fn extract(content: &str, language: Option<SupportedLanguage>) -> Extraction {
    match language {
        Some(lang) => match structural_extractor(lang).extract(content) {
            Some(extraction) => extraction,
            None => {
                let mut extraction = fallback::extract(content);
                extraction.degraded = true;
                extraction
            }
        },
        None => fallback::extract(content),
    }
}

// ─── Shared tree-sitter helpers ─────────────────────────────────────────────

/// Parse content with the grammar for `language`. `None` when the grammar
/// cannot load or the parser gives up entirely; error nodes are fine.
pub(crate) fn parse(content: &str, language: SupportedLanguage) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&language.tree_sitter_language()).ok()?;
    parser.parse(content, None)
}

/// UTF-8 text of a node, if valid.
pub(crate) fn node_text<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    node.utf8_text(source).ok()
}

/// Text of a node's named field.
pub(crate) fn field_text(node: Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|n| node_text(n, source))
        .map(|s| s.to_string())
}

/// Strip matched single/double quotes (and angle brackets) from a literal.
pub(crate) fn strip_quotes(s: &str) -> String {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '<' || c == '>')
        .to_string()
}
