use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Macro defined for every preprocessor run, so headers can `#ifdef` around
/// constructs the grammar does not handle.
pub const DEFAULT_MARKER_MACRO: &str = "HEADERCHECK";

/// Preprocessor program used when none is configured
pub const DEFAULT_PREPROCESSOR: &str = "cpp";

/// Configuration for a header check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Preprocessor program to run
    pub preprocessor: String,

    /// Stub include directory (None = materialize the built-in stubs)
    pub stub_dir: Option<PathBuf>,

    /// Name of the marker macro passed as `-D<name>`
    pub marker_macro: String,

    /// Pass `-nostdinc` so only the stub directory provides system headers
    pub no_std_include: bool,

    /// Extra flags forwarded verbatim to the preprocessor
    pub cpp_args: Vec<String>,

    /// Check what parses instead of failing on syntax errors
    pub tolerant: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            preprocessor: DEFAULT_PREPROCESSOR.to_string(),
            stub_dir: None,
            marker_macro: DEFAULT_MARKER_MACRO.to_string(),
            no_std_include: true,
            cpp_args: Vec::new(),
            tolerant: false,
        }
    }
}

impl CheckConfig {
    /// Create config that accepts files with syntax errors
    pub fn tolerant() -> Self {
        Self {
            tolerant: true,
            ..Default::default()
        }
    }

    /// Set the preprocessor program
    pub fn with_preprocessor(mut self, program: impl Into<String>) -> Self {
        self.preprocessor = program.into();
        self
    }

    /// Use an existing stub include directory
    pub fn with_stub_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stub_dir = Some(dir.into());
        self
    }

    /// Set the marker macro name
    pub fn with_marker_macro(mut self, name: impl Into<String>) -> Self {
        self.marker_macro = name.into();
        self
    }

    /// Set the flags forwarded to the preprocessor
    pub fn with_cpp_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cpp_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable tolerant mode
    pub fn with_tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }
}
