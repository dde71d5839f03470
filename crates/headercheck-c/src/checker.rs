//! Resolution checker
//!
//! Decides whether every name a file declares with external linkage is also
//! defined in that file. A name becomes pending when the target file itself
//! declares it `extern` or as a prototype without an initializer. Any
//! function body with that name, or any other named declaration of it (an
//! initialized one, or a tentative definition), resolves it wherever it
//! appears in the unit.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use serde::Serialize;

use crate::ast::{ExternalItem, TranslationUnit};

/// Outcome of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No dangling external declarations: the file is header-only
    Resolved,
    /// At least one externally declared name is never defined here
    Unresolved,
}

impl Verdict {
    pub fn is_resolved(self) -> bool {
        self == Verdict::Resolved
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Resolved => write!(f, "resolved"),
            Verdict::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Identity of the file under test, compared against declaration origins
#[derive(Debug, Clone)]
pub struct FileIdentity {
    name: String,
    canonical: Option<PathBuf>,
}

impl FileIdentity {
    /// Identity of an on-disk file, spelled the way it was handed to the
    /// preprocessor
    pub fn new(path: &Path) -> Self {
        Self {
            name: path.to_string_lossy().into_owned(),
            canonical: path.canonicalize().ok(),
        }
    }

    /// Identity that only matches by exact name (in-memory sources)
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonical: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a line-marker file name refers to this file
    pub fn matches(&self, origin: &str) -> bool {
        if origin == self.name {
            return true;
        }
        match &self.canonical {
            Some(canonical) => Path::new(origin)
                .canonicalize()
                .map(|other| &other == canonical)
                .unwrap_or(false),
            None => false,
        }
    }
}

/// Memoized [`FileIdentity::matches`], one lookup per distinct origin string
struct OriginCache<'a> {
    target: &'a FileIdentity,
    seen: HashMap<&'a str, bool>,
}

impl<'a> OriginCache<'a> {
    fn new(target: &'a FileIdentity) -> Self {
        Self {
            target,
            seen: HashMap::new(),
        }
    }

    fn is_target(&mut self, origin: &'a str) -> bool {
        let target = self.target;
        *self
            .seen
            .entry(origin)
            .or_insert_with(|| target.matches(origin))
    }
}

/// A name left unresolved at the end of a check
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct UnresolvedDeclaration {
    pub name: String,
    /// Line of the first declaration that made the name pending
    pub line: usize,
}

/// External-linkage names declared by the target file and not yet resolved
#[derive(Debug, Clone, Default)]
pub struct PendingDeclarations {
    entries: HashMap<String, usize>,
}

impl PendingDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` pending; a name already pending keeps its first line
    pub fn add(&mut self, name: &str, line: usize) {
        self.entries.entry(name.to_string()).or_insert(line);
    }

    /// Resolve `name`. Absent names are ignored.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remaining entries ordered by name
    pub fn into_sorted(self) -> Vec<UnresolvedDeclaration> {
        let mut names: Vec<_> = self
            .entries
            .into_iter()
            .map(|(name, line)| UnresolvedDeclaration { name, line })
            .collect();
        names.sort();
        names
    }
}

/// Verdict plus the names that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    pub unresolved: Vec<UnresolvedDeclaration>,
}

/// Run the linkage check over a lowered unit
pub fn check(unit: &TranslationUnit, target: &FileIdentity) -> CheckOutcome {
    let mut pending = PendingDeclarations::new();
    let mut resolving: HashSet<&str> = HashSet::new();
    let mut origins = OriginCache::new(target);

    for item in &unit.items {
        match item {
            ExternalItem::Declaration(decl) => match decl.name.as_deref() {
                Some(name) if decl.is_external() => {
                    let local = decl
                        .origin
                        .as_deref()
                        .is_some_and(|origin| origins.is_target(origin));
                    if local {
                        trace!("Pending: {name} (line {})", decl.line);
                        pending.add(name, decl.line);
                    }
                }
                Some(name) => {
                    resolving.insert(name);
                }
                None => {}
            },
            ExternalItem::FunctionDefinition(def) => {
                if let Some(name) = def.name.as_deref() {
                    resolving.insert(name);
                }
            }
            ExternalItem::Other => {}
        }
    }

    // Removal is deferred so a definition resolves declarations that follow it
    for name in resolving {
        if pending.remove(name) {
            trace!("Resolved: {name}");
        }
    }

    let verdict = if pending.is_empty() {
        Verdict::Resolved
    } else {
        Verdict::Unresolved
    };
    debug!(
        "{}: {verdict} ({} unresolved)",
        target.name(),
        pending.len()
    );

    CheckOutcome {
        verdict,
        unresolved: pending.into_sorted(),
    }
}
