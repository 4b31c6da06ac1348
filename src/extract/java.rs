//! Java reference extraction via AST traversal.

use super::{field_text, node_text, parse, Extraction, ReferenceExtractor, SupportedLanguage};

pub struct JavaExtractor;

impl ReferenceExtractor for JavaExtractor {
    fn extract(&self, content: &str) -> Option<Extraction> {
        let tree = parse(content, SupportedLanguage::Java)?;
        let source = content.as_bytes();
        let mut out = Extraction::default();

        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "record_declaration"
                | "annotation_type_declaration" => {
                    if let Some(name) = field_text(child, "name", source) {
                        out.defines.insert(name);
                    }
                }
                "import_declaration" => {
                    // import com.example.util.Helper; — grab the qualified
                    // name, skipping the keyword and any `static` modifier.
                    let mut inner = child.walk();
                    for part in child.children(&mut inner) {
                        if part.kind() == "scoped_identifier" || part.kind() == "identifier" {
                            if let Some(text) = node_text(part, source) {
                                out.references.insert(text.to_string());
                            }
                            break;
                        }
                    }
                }
                _ => {}
            }
        }

        Some(out)
    }
}
