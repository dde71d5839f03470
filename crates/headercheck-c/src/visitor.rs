//! Lowering of the tree-sitter C syntax tree
//!
//! The visitor walks the top level of a translation unit and produces
//! [`ExternalItem`]s:
//! - Declarations (one per declarator, with storage class and shape)
//! - Function definitions
//!
//! Function bodies, parameter lists and struct members are never entered.

use tree_sitter::Node;

use crate::ast::{Declaration, ExternalItem, FunctionDefinition};
use crate::linemap::LineMap;

/// Derivation applied to a declarator on the way to its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Derivation {
    Function,
    Pointer,
    Array,
}

pub struct DeclVisitor<'a> {
    pub source: &'a [u8],
    line_map: &'a LineMap,
    pub items: Vec<ExternalItem>,
}

impl<'a> DeclVisitor<'a> {
    pub fn new(source: &'a [u8], line_map: &'a LineMap) -> Self {
        Self {
            source,
            line_map,
            items: Vec::new(),
        }
    }

    fn node_text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    /// Resolve a node's row through the line map
    fn locate(&self, node: Node) -> (Option<String>, usize) {
        let row = node.start_position().row;
        match self.line_map.origin(row) {
            Some(origin) => (Some(origin.file.to_string()), origin.line),
            None => (None, row + 1),
        }
    }

    pub fn visit_node(&mut self, node: Node) {
        match node.kind() {
            // Containers whose children are top-level items. ERROR nodes only
            // survive to here in tolerant mode. Conditional blocks only appear
            // in unpreprocessed text; every branch is taken.
            "translation_unit" | "ERROR" | "declaration_list" => self.visit_children(node),
            "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif"
            | "preproc_elifdef" => self.visit_children(node),
            "linkage_specification" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_node(body);
                }
            }
            "declaration" => self.visit_declaration(node),
            "function_definition" => self.visit_function(node),
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                let (origin, line) = self.locate(node);
                self.items.push(ExternalItem::Declaration(Declaration {
                    name: None,
                    has_initializer: false,
                    is_extern: false,
                    is_prototype: false,
                    origin,
                    line,
                }));
            }
            _ if node.is_named() => self.items.push(ExternalItem::Other),
            _ => {}
        }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_node(child);
        }
    }

    fn visit_declaration(&mut self, node: Node) {
        let is_extern = self.has_storage_class(node, "extern");

        let mut declarators = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("declarator", &mut cursor) {
            declarators.push(child);
        }

        if declarators.is_empty() {
            let (origin, line) = self.locate(node);
            self.items.push(ExternalItem::Declaration(Declaration {
                name: None,
                has_initializer: false,
                is_extern,
                is_prototype: false,
                origin,
                line,
            }));
            return;
        }

        for declarator in declarators {
            let (declarator, has_initializer) = if declarator.kind() == "init_declarator" {
                let inner = declarator.child_by_field_name("declarator");
                (inner.unwrap_or(declarator), true)
            } else {
                (declarator, false)
            };

            let (identifier, derivation) = self.find_identifier(declarator);
            let (name, (origin, line)) = match identifier {
                Some(id) => (Some(self.node_text(id)), self.locate(id)),
                None => (None, self.locate(declarator)),
            };

            self.items.push(ExternalItem::Declaration(Declaration {
                name,
                has_initializer,
                is_extern,
                is_prototype: derivation == Some(Derivation::Function),
                origin,
                line,
            }));
        }
    }

    fn visit_function(&mut self, node: Node) {
        let identifier = node
            .child_by_field_name("declarator")
            .and_then(|declarator| self.find_identifier(declarator).0);

        let (name, (origin, line)) = match identifier {
            Some(id) => (Some(self.node_text(id)), self.locate(id)),
            None => (None, self.locate(node)),
        };

        self.items.push(ExternalItem::FunctionDefinition(FunctionDefinition {
            name,
            origin,
            line,
        }));
    }

    fn has_storage_class(&self, node: Node, class: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| child.kind() == "storage_class_specifier" && self.node_text(child) == class);
        found
    }

    /// Walk a declarator down to its identifier, returning it together with the
    /// innermost derivation. `int *f(void)` ends in a function derivation,
    /// `int (*fp)(void)` in a pointer one.
    fn find_identifier<'t>(&self, node: Node<'t>) -> (Option<Node<'t>>, Option<Derivation>) {
        let mut current = node;
        let mut derivation = None;

        loop {
            let (next, step) = match current.kind() {
                "identifier" => return (Some(current), derivation),
                "function_declarator" => (
                    current.child_by_field_name("declarator"),
                    Some(Derivation::Function),
                ),
                "pointer_declarator" => (
                    current.child_by_field_name("declarator"),
                    Some(Derivation::Pointer),
                ),
                "array_declarator" => (
                    current.child_by_field_name("declarator"),
                    Some(Derivation::Array),
                ),
                "parenthesized_declarator" | "attributed_declarator" => {
                    (Self::inner_declarator(current), None)
                }
                _ => return (None, derivation),
            };

            match next {
                Some(next) => {
                    if step.is_some() {
                        derivation = step;
                    }
                    current = next;
                }
                None => return (None, derivation),
            }
        }
    }

    fn inner_declarator(node: Node) -> Option<Node> {
        let mut cursor = node.walk();
        let found = node.named_children(&mut cursor).find(|child| {
            child.kind() == "identifier" || child.kind().ends_with("_declarator")
        });
        found
    }
}
