//! Pattern matchers over parsed Go files.
//!
//! Each matcher turns one file's `FileFacts` into zero or more
//! `Definition`s. Classification itself is delegated to the rule table in
//! `naming`.

mod grpc;
pub mod naming;
mod structs;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::analysis::{Declaration, FileFacts};

pub use grpc::{Matcher, RoleMatcher, ServiceMatcher};
pub use naming::{classify, RpcRole};
pub use structs::structs_map;

/// File path plus position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// 1-indexed.
    pub line: usize,
    /// 1-indexed.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// One discovered declaration of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub package: String,
    pub location: SourceLocation,
    /// Verbatim declaration text; set for struct definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl Definition {
    /// A definition named after the declaration itself.
    pub fn from_declaration(facts: &FileFacts, decl: &Declaration) -> Self {
        Self::named(decl.name.clone(), facts, decl)
    }

    /// A definition with a derived name, located at `decl`.
    pub fn named(name: String, facts: &FileFacts, decl: &Declaration) -> Self {
        Self {
            name,
            package: facts.package.clone(),
            location: SourceLocation {
                path: facts.path.clone(),
                line: decl.span.start_line,
                column: decl.span.start_col,
            },
            raw_text: None,
        }
    }

    pub fn with_raw_text(mut self, text: &str) -> Self {
        self.raw_text = Some(text.to_string());
        self
    }
}
