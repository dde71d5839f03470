//! Lowered syntax tree
//!
//! Only the shape the linkage check needs survives lowering: top-level
//! declarations, function definitions, and everything else collapsed into
//! [`ExternalItem::Other`].

use serde::Serialize;

/// One top-level item of a translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExternalItem {
    Declaration(Declaration),
    FunctionDefinition(FunctionDefinition),
    /// Typedefs, pragmas, stray tokens and anything else
    Other,
}

/// A single declarator of a declaration.
///
/// `int a, b = 1;` lowers to two of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Declared identifier; None for tag-only declarations such as `struct S;`
    pub name: Option<String>,
    /// `= value` is attached to this declarator
    pub has_initializer: bool,
    /// Storage class includes `extern`
    pub is_extern: bool,
    /// The derivation closest to the identifier is a function declarator
    pub is_prototype: bool,
    /// File the identifier physically came from
    pub origin: Option<String>,
    /// Line in `origin`
    pub line: usize,
}

impl Declaration {
    /// Whether this declaration, taken alone, leaves `name` to be defined in
    /// some other translation unit.
    pub fn is_external(&self) -> bool {
        self.name.is_some() && !self.has_initializer && (self.is_extern || self.is_prototype)
    }
}

/// A function with a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDefinition {
    pub name: Option<String>,
    pub origin: Option<String>,
    pub line: usize,
}

/// A lowered translation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationUnit {
    pub items: Vec<ExternalItem>,
}

impl TranslationUnit {
    pub fn new(items: Vec<ExternalItem>) -> Self {
        Self { items }
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            ExternalItem::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn function_definitions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.items.iter().filter_map(|item| match item {
            ExternalItem::FunctionDefinition(def) => Some(def),
            _ => None,
        })
    }
}
