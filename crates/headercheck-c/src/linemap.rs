//! Line origin tracking for preprocessed source
//!
//! The preprocessor inlines included files and announces every switch with a
//! line marker (`# 12 "foo.h" 2`). This module records, for every line of the
//! preprocessed text, the physical file and line it came from, and replaces
//! the marker lines with empty lines so that parser rows index the map
//! directly.

use regex::Regex;
use std::sync::LazyLock;

// `# 12 "file" 1 3` as emitted by gcc/clang, and `#line 12 "file"`
static RE_LINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*(?:line\s+)?(\d+)(?:\s+"((?:[^"\\]|\\.)*)")?"#)
        .expect("Invalid regex")
});

/// Where a line of preprocessed output originally came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin<'a> {
    pub file: &'a str,
    /// 1-based line number in `file`
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
struct RowEntry {
    file: Option<usize>,
    line: usize,
}

/// Per-row origin table for a preprocessed source
#[derive(Debug, Clone, Default)]
pub struct LineMap {
    files: Vec<String>,
    rows: Vec<RowEntry>,
}

/// Preprocessed source with its marker lines blanked out
#[derive(Debug)]
pub struct MappedSource {
    /// Code ready for parsing; same number of rows as the input
    pub code: String,
    pub line_map: LineMap,
}

impl LineMap {
    /// Build the map for `text`, attributing lines before the first marker to
    /// `default_file`.
    pub fn build(text: &str, default_file: Option<&str>) -> MappedSource {
        let mut map = LineMap::default();
        let mut current = default_file.map(|name| map.intern(name));
        let mut next_line = 1;
        let mut code = String::with_capacity(text.len());

        for (row, raw) in text.split('\n').enumerate() {
            if row > 0 {
                code.push('\n');
            }
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some(caps) = RE_LINE_MARKER.captures(line) {
                if let Some(file) = caps.get(2) {
                    current = Some(map.intern(&unescape(file.as_str())));
                }
                next_line = caps[1].parse().unwrap_or(next_line);
                map.rows.push(RowEntry {
                    file: None,
                    line: 0,
                });
                continue;
            }

            map.rows.push(RowEntry {
                file: current,
                line: next_line,
            });
            next_line += 1;
            code.push_str(raw);
        }

        MappedSource {
            code,
            line_map: map,
        }
    }

    /// Origin of a 0-based row of the preprocessed text
    pub fn origin(&self, row: usize) -> Option<Origin<'_>> {
        let entry = self.rows.get(row)?;
        let file = self.files.get(entry.file?)?;
        Some(Origin {
            file,
            line: entry.line,
        })
    }

    /// Every distinct file named by the markers, in order of first appearance
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Number of rows covered by the map
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(idx) = self.files.iter().position(|f| f == name) {
            return idx;
        }
        self.files.push(name.to_string());
        self.files.len() - 1
    }
}

/// Undo the escaping the preprocessor applies to file names in markers
fn unescape(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let octal_len = bytes[i + 1..]
            .iter()
            .take(3)
            .take_while(|b| (b'0'..=b'7').contains(b))
            .count();
        if octal_len > 0 {
            let digits = &name[i + 1..i + 1 + octal_len];
            out.push(u8::from_str_radix(digits, 8).unwrap_or(b'?'));
            i += 1 + octal_len;
        } else {
            out.push(bytes[i + 1]);
            i += 2;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_switch_files() {
        let text = "# 1 \"foo.h\"\nint a;\n# 1 \"bar.h\" 1\nint b;\nint c;\n# 3 \"foo.h\" 2\nint d;";
        let mapped = LineMap::build(text, None);
        let map = &mapped.line_map;

        assert_eq!(map.origin(1), Some(Origin { file: "foo.h", line: 1 }));
        assert_eq!(map.origin(3), Some(Origin { file: "bar.h", line: 1 }));
        assert_eq!(map.origin(4), Some(Origin { file: "bar.h", line: 2 }));
        assert_eq!(map.origin(6), Some(Origin { file: "foo.h", line: 3 }));
        assert_eq!(map.files(), &["foo.h".to_string(), "bar.h".to_string()]);
    }

    #[test]
    fn test_marker_lines_are_blanked() {
        let text = "# 1 \"foo.h\"\nint a;\n# 7 \"foo.h\"\nint b;";
        let mapped = LineMap::build(text, None);

        assert_eq!(mapped.code, "\nint a;\n\nint b;");
        assert_eq!(mapped.code.split('\n').count(), mapped.line_map.len());
        assert_eq!(mapped.line_map.origin(0), None);
        assert_eq!(mapped.line_map.origin(3).map(|o| o.line), Some(7));
    }

    #[test]
    fn test_default_file_without_markers() {
        let mapped = LineMap::build("int a;\n\nint b;", Some("plain.h"));

        assert_eq!(
            mapped.line_map.origin(2),
            Some(Origin { file: "plain.h", line: 3 })
        );
    }

    #[test]
    fn test_no_default_file_has_no_origin() {
        let mapped = LineMap::build("int a;", None);
        assert_eq!(mapped.line_map.origin(0), None);
    }

    #[test]
    fn test_line_directive_form() {
        let mapped = LineMap::build("#line 40 \"gen.h\"\nint a;\n#line 90\nint b;", None);

        assert_eq!(
            mapped.line_map.origin(1),
            Some(Origin { file: "gen.h", line: 40 })
        );
        assert_eq!(
            mapped.line_map.origin(3),
            Some(Origin { file: "gen.h", line: 90 })
        );
    }

    #[test]
    fn test_other_directives_are_not_markers() {
        let mapped = LineMap::build("#pragma once\n#include <x.h>", Some("a.h"));
        assert_eq!(mapped.code, "#pragma once\n#include <x.h>");
        assert_eq!(mapped.line_map.origin(1).map(|o| o.line), Some(2));
    }

    #[test]
    fn test_unescape_file_names() {
        assert_eq!(unescape(r#"dir\\my \"odd\" file.h"#), r#"dir\my "odd" file.h"#);
        assert_eq!(unescape(r"tab\011name.h"), "tab\tname.h");
        assert_eq!(unescape("plain.h"), "plain.h");
    }

    #[test]
    fn test_crlf_input() {
        let mapped = LineMap::build("# 1 \"w.h\"\r\nint a;\r\n", None);
        assert_eq!(mapped.line_map.origin(1), Some(Origin { file: "w.h", line: 1 }));
        assert!(mapped.code.contains("int a;\r"));
    }
}
