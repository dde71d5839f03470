//! External C preprocessor driver
//!
//! Runs the configured preprocessor with a fixed environment:
//! 1. `-nostdinc` so no real system headers are consulted
//! 2. `-I<stub dir>` so `#include <stdio.h>` resolves to a stub
//! 3. `-D<marker>` so headers can simplify constructs for analysis
//!
//! followed by the user's passthrough flags and the file itself. The output
//! keeps line markers; [`crate::linemap`] consumes them.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use log::{debug, trace};

use crate::config::CheckConfig;
use crate::errors::{CheckError, CheckResult};

pub struct Preprocessor<'a> {
    config: &'a CheckConfig,
}

impl<'a> Preprocessor<'a> {
    pub fn new(config: &'a CheckConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the preprocessor program, in order
    pub fn arguments(&self, file: &Path, stub_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if self.config.no_std_include {
            args.push("-nostdinc".into());
        }

        let mut include = OsString::from("-I");
        include.push(stub_dir);
        args.push(include);

        if !self.config.marker_macro.is_empty() {
            args.push(format!("-D{}", self.config.marker_macro).into());
        }

        args.extend(self.config.cpp_args.iter().map(OsString::from));
        args.push(file.as_os_str().to_owned());
        args
    }

    /// Preprocess `file`, returning the output text with its line markers
    pub fn run(&self, file: &Path, stub_dir: &Path) -> CheckResult<String> {
        let args = self.arguments(file, stub_dir);
        debug!("Running {} {:?}", self.config.preprocessor, args);

        let output = Command::new(&self.config.preprocessor)
            .args(&args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    CheckError::PreprocessorNotFound(self.config.preprocessor.clone(), e)
                }
                _ => CheckError::IoError(file.to_path_buf(), e),
            })?;

        if !output.status.success() {
            return Err(CheckError::PreprocessError {
                file: file.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("Preprocessed {} into {} bytes", file.display(), text.len());
        Ok(text)
    }
}
