//! Python reference extraction via AST traversal.

use super::{field_text, node_text, parse, Extraction, ReferenceExtractor, SupportedLanguage};
use tree_sitter::Node;

pub struct PythonExtractor;

impl ReferenceExtractor for PythonExtractor {
    fn extract(&self, content: &str) -> Option<Extraction> {
        let tree = parse(content, SupportedLanguage::Python)?;
        let source = content.as_bytes();
        let mut out = Extraction::default();

        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            collect(child, source, &mut out);
        }

        Some(out)
    }
}

fn collect(node: Node, source: &[u8], out: &mut Extraction) {
    match node.kind() {
        "function_definition" | "class_definition" => {
            if let Some(name) = field_text(node, "name", source) {
                out.defines.insert(name);
            }
        }
        // @decorator\ndef f(): ... — the definition sits one level down.
        "decorated_definition" => {
            if let Some(inner) = node.child_by_field_name("definition") {
                collect(inner, source, out);
            }
        }
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "dotted_name" => {
                        if let Some(text) = node_text(child, source) {
                            out.references.insert(text.to_string());
                        }
                    }
                    // import numpy as np — the module is the `name` field.
                    "aliased_import" => {
                        if let Some(name) = field_text(child, "name", source) {
                            out.references.insert(name);
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            if let Some(module) = field_text(node, "module_name", source) {
                out.references.insert(module);
            }
        }
        _ => {}
    }
}
