//! AST-backed Go source analysis.
//!
//! Turns one file's text into `FileFacts`: the package name plus the
//! top-level declarations the matchers classify.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source File     │────▶│ GoParser     │────▶│ FileFacts     │
//! └─────────────────┘     │ (tree-sitter)│     │ (package,     │
//!                         └──────────────┘     │  declarations)│
//!                                              └───────────────┘
//! ```

mod facts;
mod go;

pub use facts::{Declaration, DeclarationKind, FileFacts, Span};
pub use go::GoParser;
