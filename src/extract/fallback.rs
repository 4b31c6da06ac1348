//! Regex fallback extraction for unsupported languages and parser failures.
//!
//! Line-oriented and intentionally loose: it recognizes the import-like and
//! definition-like shapes shared across mainstream languages, and nothing
//! more. Good enough to keep a file participating in the dependency graph.

use super::{strip_quotes, Extraction};
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(?:import|from|use|require|include|#include)\s+([\w./:"'<>-]+)"#)
        .unwrap()
});

static REQUIRE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static DEFINITION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:pub\s+)?(?:fn|def|class|struct|function|interface|enum|trait)\s+(\w+)")
        .unwrap()
});

pub fn extract(content: &str) -> Extraction {
    let mut out = Extraction::default();

    for capture in IMPORT_LINE.captures_iter(content) {
        let raw = capture[1].trim_end_matches(';');
        out.references.insert(strip_quotes(raw));
    }
    for capture in REQUIRE_CALL.captures_iter(content) {
        out.references.insert(capture[1].to_string());
    }
    for capture in DEFINITION_LINE.captures_iter(content) {
        out.defines.insert(capture[1].to_string());
    }

    out
}
