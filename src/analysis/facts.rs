//! Fact structures extracted from a parsed Go file.

use std::path::PathBuf;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

/// Shape of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Interface,
    Struct,
    /// Any other named type (`type Code int32`, `type Handler func()`).
    Type,
    Function,
}

impl DeclarationKind {
    /// Concrete types are named types that are not interfaces.
    pub fn is_concrete_type(&self) -> bool {
        matches!(self, DeclarationKind::Struct | DeclarationKind::Type)
    }
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub span: Span,
    /// Interface method names, struct field names or embedded type names.
    pub members: Vec<String>,
    /// Parameter type texts of a function, pointer stars removed.
    pub param_types: Vec<String>,
    /// Verbatim declaration text, always starting with `type` or `func`.
    pub text: String,
}

/// All facts extracted from a single file.
#[derive(Debug, Clone)]
pub struct FileFacts {
    pub path: PathBuf,
    /// Name from the package clause, never empty.
    pub package: String,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl FileFacts {
    /// Find declarations by kind.
    pub fn declarations_by_kind(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }
}
