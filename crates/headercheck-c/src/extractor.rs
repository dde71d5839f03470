//! AST extraction for preprocessed C source
//!
//! This module provides two parsing modes:
//! - Strict mode: Fails on syntax errors (default, a verdict on a partial
//!   parse could be wrong)
//! - Tolerant mode: Lowers whatever parsed and reports the file as partial

use std::path::{Path, PathBuf};

use log::{debug, warn};
use tree_sitter::{Node, Parser};

use crate::ast::TranslationUnit;
use crate::errors::{CheckError, CheckResult};
use crate::linemap::{LineMap, MappedSource};
use crate::visitor::DeclVisitor;

/// Extraction options for controlling parser behavior
#[derive(Debug, Clone, Default)]
pub struct ExtractionOptions {
    /// If true, extract declarations even when the AST has errors
    pub tolerant_mode: bool,
}

impl ExtractionOptions {
    /// Create options for tolerant parsing of any code
    pub fn tolerant() -> Self {
        Self {
            tolerant_mode: true,
        }
    }
}

/// Result of extraction with additional metadata
#[derive(Debug)]
pub struct ExtractionResult {
    pub unit: TranslationUnit,
    /// Number of syntax errors encountered (0 = clean parse)
    pub error_count: usize,
    /// Whether the file was fully parsed or partially
    pub is_partial: bool,
}

/// Parse preprocessed `source` and lower it.
///
/// Lines before the first line marker are attributed to `file_path`, so
/// unpreprocessed text can be checked directly.
pub fn extract(
    source: &str,
    file_path: &Path,
    options: &ExtractionOptions,
) -> CheckResult<ExtractionResult> {
    let default_origin = file_path.to_string_lossy();
    let MappedSource { code, line_map } = LineMap::build(source, Some(&*default_origin));

    let mut parser = Parser::new();
    let language = tree_sitter_c::language();
    parser
        .set_language(&language)
        .map_err(|e| CheckError::ParseError(file_path.to_path_buf(), e.to_string()))?;

    let tree = parser.parse(&code, None).ok_or_else(|| {
        CheckError::ParseError(file_path.to_path_buf(), "Failed to parse".to_string())
    })?;

    let root_node = tree.root_node();
    let has_error = root_node.has_error();
    let error_count = if has_error {
        count_errors(root_node)
    } else {
        0
    };

    if has_error {
        if !options.tolerant_mode {
            return Err(syntax_error(root_node, &code, &line_map, file_path, error_count));
        }
        warn!(
            "{}: {error_count} syntax errors, checking the parts that parsed",
            file_path.display()
        );
    }

    let mut visitor = DeclVisitor::new(code.as_bytes(), &line_map);
    visitor.visit_node(root_node);
    debug!(
        "Lowered {} top-level items from {}",
        visitor.items.len(),
        file_path.display()
    );

    Ok(ExtractionResult {
        unit: TranslationUnit::new(visitor.items),
        error_count,
        is_partial: has_error,
    })
}

/// Count ERROR nodes in the syntax tree
fn count_errors(node: Node) -> usize {
    let mut count = 0;

    if node.is_error() || node.is_missing() {
        count += 1;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count += count_errors(child);
    }

    count
}

/// First ERROR or MISSING node in document order
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Build a strict-mode error positioned in the file the bad line came from
fn syntax_error(
    root: Node,
    code: &str,
    line_map: &LineMap,
    file_path: &Path,
    error_count: usize,
) -> CheckError {
    let Some(node) = first_error(root) else {
        return CheckError::SyntaxError(
            file_path.to_path_buf(),
            0,
            0,
            format!("Syntax error ({error_count} error nodes)"),
        );
    };

    let position = node.start_position();
    let (file, line) = match line_map.origin(position.row) {
        Some(origin) => (PathBuf::from(origin.file), origin.line),
        None => (file_path.to_path_buf(), position.row + 1),
    };

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = node.utf8_text(code.as_bytes()).unwrap_or("");
        let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
        format!("unexpected `{}`", snippet.trim())
    };

    CheckError::SyntaxError(
        file,
        line,
        position.column + 1,
        format!("{message} ({error_count} error nodes)"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExternalItem;

    #[test]
    fn test_extract_simple_function() {
        let source = r#"
int main() {
    return 0;
}
"#;
        let result = extract(source, Path::new("test.c"), &ExtractionOptions::default());

        assert!(result.is_ok());
        let result = result.unwrap();
        assert_eq!(result.unit.function_definitions().count(), 1);
        assert!(!result.is_partial);
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn test_extract_attributes_lines_to_file_path() {
        let source = "\n\nextern int counter;\n";
        let result = extract(source, Path::new("lib.h"), &ExtractionOptions::default()).unwrap();

        let decl = result.unit.declarations().next().unwrap();
        assert_eq!(decl.origin.as_deref(), Some("lib.h"));
        assert_eq!(decl.line, 3);
    }

    #[test]
    fn test_extract_with_syntax_error_strict() {
        let source = r#"
int broken( {
    // Missing closing brace
"#;
        let result = extract(source, Path::new("test.h"), &ExtractionOptions::default());

        match result {
            Err(CheckError::SyntaxError(file, line, _, _)) => {
                assert_eq!(file, PathBuf::from("test.h"));
                assert!(line >= 2);
            }
            other => panic!("Expected SyntaxError, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_reports_origin_file() {
        let source = "# 1 \"main.h\"\nint ok;\n# 1 \"inc.h\" 1\nint broken( {\n";
        let result = extract(source, Path::new("main.h"), &ExtractionOptions::default());

        match result {
            Err(CheckError::SyntaxError(file, _, _, _)) => {
                assert_eq!(file, PathBuf::from("inc.h"));
            }
            other => panic!("Expected SyntaxError, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_with_syntax_error_tolerant() {
        let source = r#"
int valid_func() { return 0; }
int broken( {
int another_valid() { return 1; }
"#;
        let result = extract(source, Path::new("test.c"), &ExtractionOptions::tolerant());

        assert!(result.is_ok());
        let extraction = result.unwrap();
        assert!(extraction.is_partial);
        assert!(extraction.error_count > 0);
        assert!(extraction
            .unit
            .items
            .iter()
            .any(|item| matches!(item, ExternalItem::FunctionDefinition(_))));
    }
}
