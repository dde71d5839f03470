use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a file from being checked at all.
///
/// None of these mean "the file is not header-only"; they mean the question
/// could not be answered.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Failed to read a file or create the stub include directory
    #[error("IO error on {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// The preprocessor program could not be started
    #[error("Preprocessor `{0}` could not be started: {1}")]
    PreprocessorNotFound(String, #[source] std::io::Error),

    /// The preprocessor ran but rejected the input
    #[error("Preprocessing {file} failed ({status}):\n{stderr}")]
    PreprocessError {
        file: PathBuf,
        status: String,
        stderr: String,
    },

    /// Syntax error in the preprocessed source (strict mode only)
    #[error("Syntax error in {0}:{1}:{2}: {3}")]
    SyntaxError(PathBuf, usize, usize, String),

    /// The grammar could not be loaded or produced no tree
    #[error("Parse error in {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;
