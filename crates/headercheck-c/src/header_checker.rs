//! Header checker: preprocessing, extraction and the linkage check in one call

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::checker::{check, FileIdentity, UnresolvedDeclaration, Verdict};
use crate::config::CheckConfig;
use crate::errors::{CheckError, CheckResult};
use crate::extractor::{extract, ExtractionOptions, ExtractionResult};
use crate::preprocessor::Preprocessor;
use crate::stubs::StubDir;

/// Everything known about one checked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub file: PathBuf,
    pub verdict: Verdict,
    pub unresolved: Vec<UnresolvedDeclaration>,
    /// Syntax errors skipped in tolerant mode
    pub error_count: usize,
    pub is_partial: bool,
}

impl CheckReport {
    pub fn is_header_only(&self) -> bool {
        self.verdict.is_resolved()
    }
}

/// Checks C files for declarations that need another translation unit
#[derive(Debug, Clone, Default)]
pub struct HeaderChecker {
    config: CheckConfig,
}

impl HeaderChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CheckConfig) -> Self {
        Self { config }
    }

    fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            tolerant_mode: self.config.tolerant,
        }
    }

    /// Preprocess and check a file on disk
    pub fn check_file(&self, path: &Path) -> CheckResult<CheckReport> {
        fs::metadata(path).map_err(|e| CheckError::IoError(path.to_path_buf(), e))?;

        let stub_dir = StubDir::resolve(self.config.stub_dir.as_deref())?;
        let preprocessed = Preprocessor::new(&self.config).run(path, stub_dir.path())?;
        let extraction = extract(&preprocessed, path, &self.extraction_options())?;

        let report = Self::report(path, &FileIdentity::new(path), extraction);
        info!(
            "{}: {} ({} unresolved)",
            path.display(),
            report.verdict,
            report.unresolved.len()
        );
        Ok(report)
    }

    /// Check `source` without running the preprocessor.
    ///
    /// Line markers in `source` are honoured; lines outside any marker belong
    /// to `file_name`. Raw directives are not evaluated: `#include` is not
    /// expanded and every branch of a conditional block is checked, so
    /// declarations behind an include guard still count.
    pub fn check_source(&self, source: &str, file_name: &str) -> CheckResult<CheckReport> {
        let path = Path::new(file_name);
        let extraction = extract(source, path, &self.extraction_options())?;
        Ok(Self::report(
            path,
            &FileIdentity::from_name(file_name),
            extraction,
        ))
    }

    fn report(path: &Path, target: &FileIdentity, extraction: ExtractionResult) -> CheckReport {
        let outcome = check(&extraction.unit, target);
        CheckReport {
            file: path.to_path_buf(),
            verdict: outcome.verdict,
            unresolved: outcome.unresolved,
            error_count: extraction.error_count,
            is_partial: extraction.is_partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_source_resolved() {
        let report = HeaderChecker::new()
            .check_source("int foo(void) { return 1; }", "foo.h")
            .unwrap();
        assert!(report.is_header_only());
        assert!(report.unresolved.is_empty());
        assert_eq!(report.file, PathBuf::from("foo.h"));
    }

    #[test]
    fn test_check_source_unresolved() {
        let report = HeaderChecker::new()
            .check_source("extern int foo(void);", "foo.h")
            .unwrap();
        assert_eq!(report.verdict, Verdict::Unresolved);
        assert_eq!(report.unresolved[0].name, "foo");
    }

    #[test]
    fn test_check_missing_file() {
        let result = HeaderChecker::new().check_file(Path::new("/nonexistent/dir/none.h"));
        assert!(matches!(result, Err(CheckError::IoError(..))));
    }

    #[test]
    fn test_report_serializes() {
        let report = HeaderChecker::new()
            .check_source("extern int x;", "x.h")
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "unresolved");
        assert_eq!(json["unresolved"][0]["name"], "x");
        assert_eq!(json["unresolved"][0]["line"], 1);
        assert_eq!(json["is_partial"], false);
    }
}
