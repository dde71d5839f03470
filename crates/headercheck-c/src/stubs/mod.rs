//! Fake system headers
//!
//! The preprocessor runs with `-nostdinc`, so `#include <stdio.h>` must be
//! satisfied by a stub. Stubs provide the typedefs and macros a header
//! commonly relies on, and nothing that needs linking against a real libc.

mod libc;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use tempfile::TempDir;

use crate::errors::{CheckError, CheckResult};

/// Header stub definitions keyed by include path
#[derive(Debug, Clone, Default)]
pub struct HeaderStubs {
    headers: HashMap<String, String>,
}

impl HeaderStubs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in libc stub set
    pub fn libc() -> Self {
        let mut stubs = Self::new();
        libc::register(&mut stubs);
        stubs
    }

    /// Add a stub for a header path
    pub fn add(&mut self, path: &str, content: &str) {
        self.headers.insert(path.to_string(), content.to_string());
    }

    /// Check if stubs exist for a header
    pub fn has_stub(&self, path: &str) -> bool {
        self.headers.contains_key(path)
    }

    /// Get stub content for a header
    pub fn get(&self, path: &str) -> Option<&str> {
        self.headers.get(path).map(|s| s.as_str())
    }

    /// Stubbed include paths, sorted
    pub fn available_headers(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = self.headers.keys().map(|s| s.as_str()).collect();
        headers.sort_unstable();
        headers
    }

    /// Write every stub below `root`, creating subdirectories such as `sys/`
    pub fn write_to(&self, root: &Path) -> CheckResult<()> {
        for (path, content) in &self.headers {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| CheckError::IoError(parent.into(), e))?;
            }
            fs::write(&target, content).map_err(|e| CheckError::IoError(target.clone(), e))?;
        }
        Ok(())
    }

    /// Materialize the stubs into a fresh temporary directory
    pub fn materialize(&self) -> CheckResult<StubDir> {
        let dir = tempfile::Builder::new()
            .prefix("headercheck-stubs")
            .tempdir()
            .map_err(|e| CheckError::IoError(std::env::temp_dir(), e))?;
        self.write_to(dir.path())?;
        debug!(
            "Wrote {} stub headers to {}",
            self.headers.len(),
            dir.path().display()
        );
        trace!("Stub headers: {}", self.available_headers().join(" "));
        Ok(StubDir::Temporary(dir))
    }
}

/// Include directory handed to the preprocessor
#[derive(Debug)]
pub enum StubDir {
    /// Supplied by the user; left untouched
    Provided(PathBuf),
    /// Built-in stubs, removed on drop
    Temporary(TempDir),
}

impl StubDir {
    /// Use `configured` if set, otherwise materialize the built-in stubs
    pub fn resolve(configured: Option<&Path>) -> CheckResult<Self> {
        match configured {
            Some(dir) => Ok(StubDir::Provided(dir.to_path_buf())),
            None => HeaderStubs::libc().materialize(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            StubDir::Provided(path) => path,
            StubDir::Temporary(dir) => dir.path(),
        }
    }
}
