//! # headercheck-c
//!
//! Decides whether a C header is "header-only": whether every name it
//! declares with external linkage (`extern` variables, function prototypes)
//! is also defined in that same file.
//!
//! ## Features
//!
//! - Runs the system preprocessor against built-in stub libc headers
//! - Parses with tree-sitter and lowers the tree to top-level declarations
//! - Ignores declarations pulled in from included files
//! - Reports the names left unresolved, with their lines
//! - **Tolerant mode** for headers the grammar cannot fully parse
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use headercheck_c::{CheckConfig, HeaderChecker};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let checker = HeaderChecker::with_config(CheckConfig::default().with_cpp_args(["-Iinclude"]));
//! let report = checker.check_file(Path::new("include/ring_buffer.h"))?;
//!
//! if !report.is_header_only() {
//!     for name in &report.unresolved {
//!         println!("{}: {} is never defined", name.line, name.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Checking source directly
//!
//! ```rust
//! use headercheck_c::{HeaderChecker, Verdict};
//!
//! let report = HeaderChecker::new()
//!     .check_source("extern int x; int x = 5;", "x.h")
//!     .unwrap();
//! assert_eq!(report.verdict, Verdict::Resolved);
//! ```

pub mod ast;
pub mod checker;
pub mod config;
pub mod errors;
pub mod extractor;
mod header_checker;
pub mod linemap;
pub mod preprocessor;
pub mod stubs;
pub mod visitor;

pub use ast::{Declaration, ExternalItem, FunctionDefinition, TranslationUnit};
pub use checker::{
    check, CheckOutcome, FileIdentity, PendingDeclarations, UnresolvedDeclaration, Verdict,
};
pub use config::CheckConfig;
pub use errors::{CheckError, CheckResult};
pub use extractor::{ExtractionOptions, ExtractionResult};
pub use header_checker::{CheckReport, HeaderChecker};
pub use stubs::{HeaderStubs, StubDir};
