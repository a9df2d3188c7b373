//! Source file enumeration.

use std::path::{Path, PathBuf};

use globset::GlobSet;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{Result, ScanError};

/// Extension of scanned source files.
pub const SOURCE_EXTENSION: &str = "go";

/// Collect `.go` files under `root`, recursively, in file-name order.
///
/// A file root is returned as-is when it is a Go file. Unreadable entries
/// below the root are skipped; an unreadable root is a `PathError`.
pub fn collect_files(root: &Path, exclude: &GlobSet, debug: bool) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| ScanError::path(root, e))?;
    if metadata.is_file() {
        return Ok(if is_source_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                return Err(ScanError::path(root, source));
            }
            Err(e) => {
                if debug {
                    warn!(error = %e, "skipping unreadable entry");
                }
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if exclude.is_match(rel) || exclude.is_match(entry.path()) {
            continue;
        }

        files.push(entry.path().to_path_buf());
    }

    Ok(files)
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}
