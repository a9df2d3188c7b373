//! Directory-level gRPC queries.
//!
//! Each function scans `dir` recursively and returns what one matcher finds.
//! Files that fail to parse are skipped; only an inaccessible `dir` (or
//! invalid options) is an error.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::matchers::{Definition, Matcher, RoleMatcher, ServiceMatcher};
use crate::options::ScanOptions;
use crate::scan::Scanner;

fn list(dir: &Path, options: &ScanOptions, matcher: &dyn Matcher) -> Result<Vec<Definition>> {
    Scanner::new(options)?
        .scan(dir, matcher)
        .map(|scan| scan.definitions)
}

/// Client interfaces (`XxxClient`).
pub fn list_grpc_clients(dir: &Path, options: &ScanOptions) -> Result<Vec<Definition>> {
    list(dir, options, &RoleMatcher::clients())
}

/// Server interfaces (`XxxServer`, excluding `UnsafeXxxServer`).
pub fn list_grpc_servers(dir: &Path, options: &ScanOptions) -> Result<Vec<Definition>> {
    list(dir, options, &RoleMatcher::servers())
}

/// Distinct service base names, first occurrence kept.
pub fn list_grpc_services(dir: &Path, options: &ScanOptions) -> Result<Vec<Definition>> {
    list(dir, options, &ServiceMatcher)
}

/// Generated stub types (`UnimplementedXxxServer`).
pub fn list_grpc_unimplemented_servers(
    dir: &Path,
    options: &ScanOptions,
) -> Result<Vec<Definition>> {
    list(dir, options, &RoleMatcher::unimplemented_servers())
}

/// Registration functions (`RegisterXxxServer`).
pub fn list_grpc_registrars(dir: &Path, options: &ScanOptions) -> Result<Vec<Definition>> {
    list(dir, options, &RoleMatcher::registrars())
}

pub fn has_grpc_clients(dir: &Path, options: &ScanOptions) -> Result<bool> {
    Ok(!list_grpc_clients(dir, options)?.is_empty())
}

pub fn has_grpc_servers(dir: &Path, options: &ScanOptions) -> Result<bool> {
    Ok(!list_grpc_servers(dir, options)?.is_empty())
}

pub fn count_grpc_services(dir: &Path, options: &ScanOptions) -> Result<usize> {
    Ok(list_grpc_services(dir, options)?.len())
}

/// Struct definitions in a single file, keyed by name.
///
/// Unlike the directory queries, a file that fails to parse is an error.
pub fn get_structs_map(file: &Path, options: &ScanOptions) -> Result<BTreeMap<String, Definition>> {
    Scanner::new(options)?.structs_in_file(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use tempfile::TempDir;

    #[test]
    fn test_has_follows_list() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("only_client.go"),
            "package v1\n\ntype EchoClient interface {\n    Echo() error\n}\n",
        )
        .unwrap();

        let options = ScanOptions::default();
        assert!(has_grpc_clients(temp.path(), &options).unwrap());
        assert!(!has_grpc_servers(temp.path(), &options).unwrap());
        // A client alone still names a service.
        assert_eq!(count_grpc_services(temp.path(), &options).unwrap(), 1);
    }

    #[test]
    fn test_structs_map_of_broken_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.go");
        std::fs::write(&path, "package v1\n\ntype A struct {\n").unwrap();

        let err = get_structs_map(&path, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::Parse { .. }));
    }
}
