//! JavaScript / TypeScript / TSX reference extraction via AST traversal.
//!
//! One extractor covers the whole JS ecosystem — the grammars share node
//! kinds for everything this module looks at, TypeScript just adds a few.

use super::{
    field_text, node_text, parse, strip_quotes, Extraction, ReferenceExtractor, SupportedLanguage,
};
use tree_sitter::Node;

pub struct JsExtractor {
    language: SupportedLanguage,
}

impl JsExtractor {
    pub fn javascript() -> Self {
        Self {
            language: SupportedLanguage::JavaScript,
        }
    }

    pub fn typescript() -> Self {
        Self {
            language: SupportedLanguage::TypeScript,
        }
    }

    pub fn tsx() -> Self {
        Self {
            language: SupportedLanguage::Tsx,
        }
    }
}

impl ReferenceExtractor for JsExtractor {
    fn extract(&self, content: &str) -> Option<Extraction> {
        let tree = parse(content, self.language)?;
        let source = content.as_bytes();
        let mut out = Extraction::default();

        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            collect_top_level(child, source, &mut out);
        }
        collect_requires(root, source, &mut out);

        Some(out)
    }
}

fn collect_top_level(node: Node, source: &[u8], out: &mut Extraction) {
    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "abstract_class_declaration"
        | "interface_declaration"
        | "type_alias_declaration"
        | "enum_declaration" => {
            if let Some(name) = field_text(node, "name", source) {
                out.defines.insert(name);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.children(&mut cursor) {
                if declarator.kind() == "variable_declarator" {
                    if let Some(name_node) = declarator.child_by_field_name("name") {
                        if name_node.kind() == "identifier" {
                            if let Some(name) = node_text(name_node, source) {
                                out.defines.insert(name.to_string());
                            }
                        }
                    }
                }
            }
        }
        // export const x = ..., export function f() — unwrap one level.
        "export_statement" => {
            if let Some(declaration) = node.child_by_field_name("declaration") {
                collect_top_level(declaration, source, out);
            }
        }
        "import_statement" => {
            if let Some(src) = field_text(node, "source", source) {
                out.references.insert(strip_quotes(&src));
            }
        }
        _ => {}
    }
}

/// CommonJS: require("./x") calls can appear anywhere, so this walks the
/// whole tree.
fn collect_requires(node: Node, source: &[u8], out: &mut Extraction) {
    if node.kind() == "call_expression" {
        let is_require = node
            .child_by_field_name("function")
            .and_then(|f| node_text(f, source))
            .is_some_and(|name| name == "require");
        if is_require {
            if let Some(args) = node.child_by_field_name("arguments") {
                let mut cursor = args.walk();
                for arg in args.children(&mut cursor) {
                    if arg.kind() == "string" {
                        if let Some(text) = node_text(arg, source) {
                            out.references.insert(strip_quotes(text));
                        }
                        break;
                    }
                }
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_requires(child, source, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_js_definitions_and_imports() {
        let source = r#"
import { useState } from 'react';
const db = require('./db');

class ApiClient {
    fetchData(endpoint) { return null; }
}

function App() { return null; }

const API_URL = "https://api.example.com";
"#;
        let extraction = JsExtractor::javascript().extract(source).unwrap();
        assert!(extraction.defines.contains("ApiClient"));
        assert!(extraction.defines.contains("App"));
        assert!(extraction.defines.contains("API_URL"));
        assert!(extraction.references.contains("react"));
        assert!(extraction.references.contains("./db"));
    }

    #[test]
    fn extracts_typescript_type_declarations() {
        let source = r#"
import { Request } from 'express';

export interface UserDTO { id: number; }
export type UserID = number;
export enum Role { Admin, User }
export function createApp(): void {}
"#;
        let extraction = JsExtractor::typescript().extract(source).unwrap();
        assert!(extraction.defines.contains("UserDTO"));
        assert!(extraction.defines.contains("UserID"));
        assert!(extraction.defines.contains("Role"));
        assert!(extraction.defines.contains("createApp"));
        assert!(extraction.references.contains("express"));
    }
}
