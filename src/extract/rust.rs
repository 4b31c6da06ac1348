//! Rust reference extraction via AST traversal.

use super::{field_text, node_text, parse, Extraction, ReferenceExtractor, SupportedLanguage};

pub struct RustExtractor;

impl ReferenceExtractor for RustExtractor {
    fn extract(&self, content: &str) -> Option<Extraction> {
        let tree = parse(content, SupportedLanguage::Rust)?;
        let source = content.as_bytes();
        let mut out = Extraction::default();

        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "function_item" | "struct_item" | "enum_item" | "trait_item" | "type_item"
                | "const_item" | "static_item" | "union_item" | "macro_definition" => {
                    if let Some(name) = field_text(child, "name", source) {
                        out.defines.insert(name);
                    }
                }
                // `mod foo { .. }` defines a module inline; `mod foo;`
                // points at a sibling file.
                "mod_item" => {
                    if let Some(name) = field_text(child, "name", source) {
                        if child.child_by_field_name("body").is_some() {
                            out.defines.insert(name);
                        } else {
                            out.references.insert(name);
                        }
                    }
                }
                "use_declaration" => {
                    if let Some(arg) = child
                        .child_by_field_name("argument")
                        .and_then(|n| node_text(n, source))
                    {
                        out.references.insert(normalize_use_path(arg));
                    }
                }
                _ => {}
            }
        }

        Some(out)
    }
}

/// Reduce a use path to its module prefix: `crate::utils::{a, b}` and
/// `crate::utils::*` both reference `crate::utils`.
fn normalize_use_path(path: &str) -> String {
    let path = path.trim();
    if let Some(idx) = path.find("::{") {
        return path[..idx].to_string();
    }
    path.trim_end_matches("::*").to_string()
}
