//! Go syntax parser using tree-sitter.
//!
//! Extracts:
//! - The package clause
//! - Type declarations (struct, interface, other named types)
//! - Top-level function declarations with their parameter types

use std::fs;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{Declaration, DeclarationKind, FileFacts, Span};
use crate::error::{Result, ScanError};

/// Tree-sitter query for extracting top-level Go declarations.
const DECLARATION_QUERY: &str = r#"
; Type declarations, one match per spec (grouped blocks included)
(type_declaration
  (type_spec
    name: (type_identifier) @type_name
    type: (_) @type_body
  ) @type_spec
) @type_decl

; Function declarations
(function_declaration
  name: (identifier) @func_name
  parameters: (parameter_list) @func_params
) @function
"#;

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Go source parser.
///
/// Queries are compiled once and shared by every file parsed.
pub struct GoParser {
    language: Language,
    package_query: Query,
    declaration_query: Query,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_go::LANGUAGE.into();
        let package_query = compile(&language, PACKAGE_QUERY)?;
        let declaration_query = compile(&language, DECLARATION_QUERY)?;
        Ok(Self {
            language,
            package_query,
            declaration_query,
        })
    }

    /// Read and parse one file.
    pub fn parse_file(&self, path: &Path) -> Result<FileFacts> {
        let source = fs::read(path).map_err(|e| ScanError::path(path, e))?;
        self.parse(path, &source)
    }

    /// Parse source text into file facts.
    ///
    /// Fails when the source has syntax errors or no package clause.
    pub fn parse(&self, path: &Path, source: &[u8]) -> Result<FileFacts> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ScanError::parse(path, e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ScanError::parse(path, "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => {
                    let pos = node.start_position();
                    format!("syntax error at {}:{}", pos.row + 1, pos.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(ScanError::parse(path, message));
        }

        let package = self
            .extract_package(root, source)
            .ok_or_else(|| ScanError::parse(path, "missing package clause"))?;
        let declarations = self.extract_declarations(root, source);

        Ok(FileFacts {
            path: path.to_path_buf(),
            package,
            declarations,
        })
    }

    fn extract_package(&self, root: Node, source: &[u8]) -> Option<String> {
        let query = &self.package_query;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, root, source);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    let text = node_text(capture.node, source);
                    if !text.is_empty() {
                        return Some(text.to_string());
                    }
                }
            }
        }
        None
    }

    fn extract_declarations(&self, root: Node, source: &[u8]) -> Vec<Declaration> {
        let query = &self.declaration_query;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, root, source);

        let mut declarations = Vec::new();

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut decl_node = None;
            let mut spec_node = None;
            let mut body_node = None;
            let mut params_node = None;

            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "type_name" | "func_name" => {
                        name = node_text(capture.node, source).to_string();
                    }
                    "type_decl" | "function" => decl_node = Some(capture.node),
                    "type_spec" => spec_node = Some(capture.node),
                    "type_body" => body_node = Some(capture.node),
                    "func_params" => params_node = Some(capture.node),
                    _ => {}
                }
            }

            let Some(decl) = decl_node else { continue };
            // Local types inside function bodies are not part of the file's surface.
            if name.is_empty() || decl.parent().map(|p| p.kind()) != Some("source_file") {
                continue;
            }

            let declaration = match (spec_node, body_node, params_node) {
                (Some(spec), Some(body), _) => type_declaration(name, decl, spec, body, source),
                (_, _, Some(params)) => Declaration {
                    name,
                    kind: DeclarationKind::Function,
                    span: Span::from_node(decl),
                    members: Vec::new(),
                    param_types: parameter_types(params, source),
                    text: node_text(decl, source).to_string(),
                },
                _ => continue,
            };
            declarations.push(declaration);
        }

        // Sort by position for deterministic output
        declarations.sort_by_key(|d| (d.span.start_byte, d.name.clone()));

        declarations
    }
}

fn compile(language: &Language, source: &str) -> Result<Query> {
    Query::new(language, source).map_err(|e| ScanError::Config(format!("bad query: {}", e)))
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn type_declaration(name: String, decl: Node, spec: Node, body: Node, source: &[u8]) -> Declaration {
    let (kind, members) = match body.kind() {
        "struct_type" => (DeclarationKind::Struct, struct_members(body, source)),
        "interface_type" => (DeclarationKind::Interface, interface_members(body, source)),
        _ => (DeclarationKind::Type, Vec::new()),
    };

    // A grouped `type ( ... )` block holds several specs; give each its own
    // `type` keyword so the text stands alone.
    let mut cursor = decl.walk();
    let spec_count = decl
        .children(&mut cursor)
        .filter(|c| c.kind() == "type_spec")
        .count();
    let (span, text) = if spec_count == 1 {
        (Span::from_node(decl), node_text(decl, source).to_string())
    } else {
        (Span::from_node(spec), format!("type {}", node_text(spec, source)))
    };

    Declaration {
        name,
        kind,
        span,
        members,
        param_types: Vec::new(),
        text,
    }
}

fn struct_members(body: Node, source: &[u8]) -> Vec<String> {
    let mut members = Vec::new();
    let mut cursor = body.walk();
    for list in body.children(&mut cursor) {
        if list.kind() != "field_declaration_list" {
            continue;
        }
        let mut list_cursor = list.walk();
        for field in list.children(&mut list_cursor) {
            if field.kind() != "field_declaration" {
                continue;
            }
            let mut name_cursor = field.walk();
            let names: Vec<String> = field
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| node_text(n, source).to_string())
                .collect();
            if names.is_empty() {
                // Embedded field: record the type name.
                if let Some(ty) = field.child_by_field_name("type") {
                    members.push(strip_type_decorations(node_text(ty, source)));
                }
            } else {
                members.extend(names);
            }
        }
    }
    members
}

fn interface_members(body: Node, source: &[u8]) -> Vec<String> {
    let mut members = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "method_elem" | "method_spec" => {
                if let Some(name) = child.child_by_field_name("name") {
                    members.push(node_text(name, source).to_string());
                }
            }
            "type_elem" | "constraint_elem" | "type_identifier" | "qualified_type" => {
                members.push(node_text(child, source).trim().to_string());
            }
            _ => {}
        }
    }
    members
}

fn parameter_types(params: Node, source: &[u8]) -> Vec<String> {
    let mut types = Vec::new();
    let mut cursor = params.walk();
    for param in params.children(&mut cursor) {
        if !matches!(
            param.kind(),
            "parameter_declaration" | "variadic_parameter_declaration"
        ) {
            continue;
        }
        if let Some(ty) = param.child_by_field_name("type") {
            types.push(strip_type_decorations(node_text(ty, source)));
        }
    }
    types
}

fn strip_type_decorations(text: &str) -> String {
    text.trim().trim_start_matches("...").trim_start_matches('*').to_string()
}
