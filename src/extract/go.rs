//! Go reference extraction via AST traversal.

use super::{field_text, parse, strip_quotes, Extraction, ReferenceExtractor, SupportedLanguage};
use tree_sitter::Node;

pub struct GoExtractor;

impl ReferenceExtractor for GoExtractor {
    fn extract(&self, content: &str) -> Option<Extraction> {
        let tree = parse(content, SupportedLanguage::Go)?;
        let source = content.as_bytes();
        let mut out = Extraction::default();

        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "function_declaration" | "method_declaration" => {
                    if let Some(name) = field_text(child, "name", source) {
                        out.defines.insert(name);
                    }
                }
                "type_declaration" => {
                    collect_specs(child, "type_spec", source, &mut out);
                }
                "const_declaration" | "var_declaration" => {
                    collect_specs(child, "const_spec", source, &mut out);
                    collect_specs(child, "var_spec", source, &mut out);
                }
                "import_declaration" => {
                    collect_imports(child, source, &mut out);
                }
                _ => {}
            }
        }

        Some(out)
    }
}

/// Declarations group specs: `type (A struct{}; B struct{})`.
fn collect_specs(node: Node, kind: &str, source: &[u8], out: &mut Extraction) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            if let Some(name) = field_text(child, "name", source) {
                out.defines.insert(name);
            }
        } else if child.kind() == "import_spec_list" || child.kind().ends_with("_spec_list") {
            collect_specs(child, kind, source, out);
        }
    }
}

fn collect_imports(node: Node, source: &[u8], out: &mut Extraction) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(path) = field_text(child, "path", source) {
                    out.references.insert(strip_quotes(&path));
                }
            }
            "import_spec_list" => collect_imports(child, source, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_definitions_and_imports() {
        let source = r#"
package server

import (
    "fmt"
    "net/http"
)

type Handler struct {
    routes map[string]string
}

const MaxConnections = 100

func NewHandler() *Handler {
    return &Handler{}
}

func (h *Handler) Serve() {
    fmt.Println("serving")
}
"#;
        let extraction = GoExtractor.extract(source).unwrap();
        assert!(extraction.defines.contains("Handler"));
        assert!(extraction.defines.contains("MaxConnections"));
        assert!(extraction.defines.contains("NewHandler"));
        assert!(extraction.defines.contains("Serve"));
        assert!(extraction.references.contains("fmt"));
        assert!(extraction.references.contains("net/http"));
    }

    #[test]
    fn single_import_form() {
        let source = "package x\n\nimport \"strings\"\n";
        let extraction = GoExtractor.extract(source).unwrap();
        assert!(extraction.references.contains("strings"));
    }
}
