//! Directory scanner that runs a matcher over every source file.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use super::files::collect_files;
use crate::analysis::{FileFacts, GoParser};
use crate::error::{Result, ScanError};
use crate::matchers::{structs_map, Definition, Matcher};
use crate::options::ScanOptions;

/// Outcome of one directory scan.
#[derive(Debug, Default)]
pub struct Scan {
    /// Matched definitions in traversal order, then declaration order.
    pub definitions: Vec<Definition>,
    /// Files that could not be parsed; their contribution is dropped.
    pub failures: Vec<ScanError>,
    /// Number of source files visited.
    pub files_scanned: usize,
}

impl Scan {
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Runs the parser and a matcher across a directory tree.
pub struct Scanner<'a> {
    options: &'a ScanOptions,
    parser: GoParser,
}

impl<'a> Scanner<'a> {
    pub fn new(options: &'a ScanOptions) -> Result<Self> {
        Ok(Self {
            options,
            parser: GoParser::new()?,
        })
    }

    pub fn options(&self) -> &ScanOptions {
        self.options
    }

    /// Parse a single file.
    pub fn parse_file(&self, path: &Path) -> Result<FileFacts> {
        self.parser.parse_file(path)
    }

    /// Scan `root` recursively with `matcher`.
    ///
    /// Parse failures are collected in the result instead of aborting the
    /// scan. Only an inaccessible root or invalid options fail the call.
    pub fn scan(&self, root: &Path, matcher: &dyn Matcher) -> Result<Scan> {
        let exclude = self.options.exclude_set()?;
        let files = collect_files(root, &exclude, self.options.debug)?;

        if self.options.debug {
            debug!(
                root = %root.display(),
                matcher = matcher.name(),
                files = files.len(),
                "scanning"
            );
        }

        let mut scan = Scan::default();
        let mut definitions = Vec::new();

        for path in &files {
            scan.files_scanned += 1;
            match self.parser.parse_file(path) {
                Ok(facts) => {
                    let found = matcher.collect(&facts);
                    if self.options.debug {
                        for def in &found {
                            debug!(
                                matcher = matcher.name(),
                                name = %def.name,
                                package = %def.package,
                                location = %def.location,
                                "matched"
                            );
                        }
                    }
                    definitions.extend(found);
                }
                Err(e) => {
                    if self.options.debug {
                        warn!(error = %e, "skipping file");
                    }
                    scan.failures.push(e);
                }
            }
        }

        scan.definitions = matcher.finish(definitions);
        Ok(scan)
    }

    /// Struct definitions declared in one file.
    pub fn structs_in_file(&self, path: &Path) -> Result<BTreeMap<String, Definition>> {
        let facts = self.parse_file(path)?;
        let map = structs_map(&facts);
        if self.options.debug {
            debug!(file = %path.display(), structs = map.len(), "collected structs");
        }
        Ok(map)
    }
}
