//! C/C++ reference extraction via AST traversal.

use super::{
    field_text, node_text, parse, strip_quotes, Extraction, ReferenceExtractor, SupportedLanguage,
};
use tree_sitter::Node;

pub struct CppExtractor;

impl ReferenceExtractor for CppExtractor {
    fn extract(&self, content: &str) -> Option<Extraction> {
        let tree = parse(content, SupportedLanguage::Cpp)?;
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
        "function_definition" => {
            if let Some(name) = declarator_name(node, source) {
                out.defines.insert(name);
            }
        }
        // Forward declarations (`struct Foo;`) have no body and define
        // nothing here.
        "struct_specifier" | "class_specifier" | "enum_specifier" | "union_specifier" => {
            if node.child_by_field_name("body").is_some() {
                if let Some(name) = field_text(node, "name", source) {
                    out.defines.insert(name);
                }
            }
        }
        "type_definition" => {
            if let Some(name) = field_text(node, "declarator", source) {
                out.defines.insert(name);
            }
        }
        "preproc_include" => {
            if let Some(path) = field_text(node, "path", source) {
                out.references.insert(strip_quotes(&path));
            }
        }
        // Namespaces and linkage blocks wrap further top-level items.
        "namespace_definition" | "linkage_specification" => {
            if let Some(body) = node.child_by_field_name("body") {
                let mut cursor = body.walk();
                for child in body.children(&mut cursor) {
                    collect(child, source, out);
                }
            }
        }
        _ => {}
    }
}

/// Descend through pointer/reference declarators to the function name.
fn declarator_name(node: Node, source: &[u8]) -> Option<String> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "function_declarator" => {
                let inner = current.child_by_field_name("declarator")?;
                return node_text(inner, source).map(|s| s.to_string());
            }
            "pointer_declarator" | "reference_declarator" => {
                current = current.child_by_field_name("declarator")?;
            }
            _ => return node_text(current, source).map(|s| s.to_string()),
        }
    }
}
