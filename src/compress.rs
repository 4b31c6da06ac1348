//! Content compression: keep the shape, drop the bulk.
//!
//! Structural mode parses the file and replaces function bodies with a
//! placeholder while signatures, types, and imports survive untouched.
//! Strip mode removes comments and collapses blank runs. Both are
//! idempotent, and neither ever mutates the original content.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use crate::config::CompressionMode;
use crate::extract::{parse, SupportedLanguage};

/// What replaces a brace-delimited function body.
const BODY_PLACEHOLDER: &str = "{ /* ... */ }";
/// Python bodies have no braces; an ellipsis statement is valid in place.
const PYTHON_PLACEHOLDER: &str = "...";

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*//[^\n]*\n?").unwrap());
static TRAILING_LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+//[^\n]*").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static HASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*#[^\n]*\n?").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Compress `content` according to the mode.
///
/// `None` passes content through unchanged. Structural mode falls back to
/// stripping when the language is unsupported or does not parse.
pub fn compress(content: &str, language: Option<SupportedLanguage>, mode: CompressionMode) -> String {
    match mode {
        CompressionMode::None => content.to_string(),
        CompressionMode::Strip => strip(content, language),
        CompressionMode::Structural => match language.and_then(|lang| elide_bodies(content, lang)) {
            Some(compressed) => compressed,
            None => strip(content, language),
        },
    }
}

/// Replace every outermost function body with a placeholder. `None` when
/// the content does not parse.
fn elide_bodies(content: &str, language: SupportedLanguage) -> Option<String> {
    let tree = parse(content, language)?;
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    collect_bodies(tree.root_node(), language, &mut ranges);

    // Outermost ranges only: nested functions disappear with the body
    // that holds them.
    ranges.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    let mut kept: Vec<(usize, usize)> = Vec::new();
    for range in ranges {
        if kept.last().map_or(true, |&(_, end)| range.0 >= end) {
            kept.push(range);
        }
    }

    let placeholder = match language {
        SupportedLanguage::Python => PYTHON_PLACEHOLDER,
        _ => BODY_PLACEHOLDER,
    };
    let mut output = content.to_string();
    for &(start, end) in kept.iter().rev() {
        output.replace_range(start..end, placeholder);
    }
    Some(output)
}

fn collect_bodies(node: Node, language: SupportedLanguage, ranges: &mut Vec<(usize, usize)>) {
    if let Some(body) = body_of(node, language) {
        ranges.push((body.start_byte(), body.end_byte()));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_bodies(child, language, ranges);
    }
}

/// The elidable body of a function-like node, when this node has one.
fn body_of<'a>(node: Node<'a>, language: SupportedLanguage) -> Option<Node<'a>> {
    let is_function = match language {
        SupportedLanguage::Rust => node.kind() == "function_item",
        SupportedLanguage::Python => node.kind() == "function_definition",
        SupportedLanguage::JavaScript | SupportedLanguage::TypeScript | SupportedLanguage::Tsx => {
            matches!(
                node.kind(),
                "function_declaration"
                    | "generator_function_declaration"
                    | "function_expression"
                    | "method_definition"
                    | "arrow_function"
            )
        }
        SupportedLanguage::Go => {
            matches!(node.kind(), "function_declaration" | "method_declaration")
        }
        SupportedLanguage::Java => {
            matches!(node.kind(), "method_declaration" | "constructor_declaration")
        }
        SupportedLanguage::Cpp => node.kind() == "function_definition",
    };
    if !is_function {
        return None;
    }

    let body = node.child_by_field_name("body")?;
    let expected = match language {
        SupportedLanguage::Rust | SupportedLanguage::Go | SupportedLanguage::Java => "block",
        SupportedLanguage::Python => "block",
        SupportedLanguage::Cpp => "compound_statement",
        _ => "statement_block",
    };
    // Arrow functions can have expression bodies; leave those alone.
    (body.kind() == expected).then_some(body)
}

/// Remove comments and collapse blank runs. Hash comments are only
/// stripped for Python, where `#` never starts a directive.
fn strip(content: &str, language: Option<SupportedLanguage>) -> String {
    let mut text = BLOCK_COMMENT.replace_all(content, "").into_owned();
    text = LINE_COMMENT.replace_all(&text, "").into_owned();
    text = TRAILING_LINE_COMMENT.replace_all(&text, "").into_owned();
    if language == Some(SupportedLanguage::Python) {
        text = HASH_COMMENT.replace_all(&text, "").into_owned();
    }
    BLANK_RUNS.replace_all(&text, "\n\n").into_owned()
}
