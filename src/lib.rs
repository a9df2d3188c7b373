//! rpcscan - static analysis of Go gRPC projects.
//!
//! rpcscan reads Go source without compiling it and reports the gRPC
//! surface a project exposes: client and server interfaces, the services
//! they belong to, generated stub types, and registration functions. It
//! also extracts struct declarations from single files and module metadata
//! from go.mod, and combines everything into one project report.
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter parsing of one file into `FileFacts`
//! - `matchers`: naming-rule classification of declarations into `Definition`s
//! - `scan`: recursive directory traversal running a matcher over every file
//! - `module`: go.mod metadata through a `ManifestSource` collaborator
//! - `grpc`: directory-level queries (`list_grpc_clients` and friends)
//! - `project`: the aggregate `ProjectReport`
//! - `report`: output formatting (pretty, JSON)
//!
//! Verbosity is carried by `ScanOptions::debug` and passed into every call;
//! there is no process-global switch.

pub mod analysis;
pub mod cli;
pub mod error;
pub mod grpc;
pub mod logging;
pub mod matchers;
pub mod module;
pub mod options;
pub mod project;
pub mod report;
pub mod scan;

pub use analysis::{Declaration, DeclarationKind, FileFacts, GoParser};
pub use error::{Result, ScanError};
pub use grpc::{
    count_grpc_services, get_structs_map, has_grpc_clients, has_grpc_servers, list_grpc_clients,
    list_grpc_registrars, list_grpc_servers, list_grpc_services, list_grpc_unimplemented_servers,
};
pub use matchers::{Definition, Matcher, RoleMatcher, RpcRole, ServiceMatcher, SourceLocation};
pub use module::{get_module_info, GoModReader, GoToolchain, ManifestSource, ModuleInfo};
pub use options::{ManifestMode, ScanOptions};
pub use project::{analyze_project, ProjectAnalyzer, ProjectReport};
pub use scan::{Scan, Scanner};
