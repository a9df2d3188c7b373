//! Manifest collaborators.
//!
//! A `ManifestSource` turns a project root into manifest JSON. `GoToolchain`
//! asks the Go toolchain; `GoModReader` reads go.mod itself and renders the
//! same document, so projects can be analyzed without Go installed.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use super::{GoModJson, ModPath, ModuleVersion, Replace, Require};
use crate::error::{Result, ScanError};

/// Supplies raw manifest JSON for a project root.
pub trait ManifestSource: Send + Sync {
    fn manifest_json(&self, root: &Path) -> Result<String>;
}

/// Runs `<program> mod edit -json` in the project root.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: String,
}

impl GoToolchain {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl ManifestSource for GoToolchain {
    fn manifest_json(&self, root: &Path) -> Result<String> {
        if !root.is_dir() {
            return Err(ScanError::path(
                root,
                std::io::Error::new(ErrorKind::NotFound, "project root is not a directory"),
            ));
        }

        let output = Command::new(&self.program)
            .args(["mod", "edit", "-json"])
            .current_dir(root)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ScanError::ToolchainNotFound {
                    program: self.program.clone(),
                },
                _ => ScanError::Toolchain(format!("running {}: {}", self.program, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ScanError::Toolchain(format!(
                "{} mod edit -json exited with {}: {}",
                self.program, output.status, stderr
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ScanError::Decode(format!("manifest output is not UTF-8: {}", e)))
    }
}

/// Reads go.mod directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModReader;

impl GoModReader {
    /// Parse go.mod content into the `go mod edit -json` shape.
    pub fn parse_go_mod(content: &str) -> GoModJson {
        let mut raw = GoModJson::default();
        let mut require = Vec::new();
        let mut replace = Vec::new();

        // Directive of the enclosing `xxx (` block, if any.
        let mut block: Option<&str> = None;

        for line in content.lines() {
            let (code, comment) = split_comment(line);
            let code = code.trim();

            if code.is_empty() {
                continue;
            }

            if code == ")" {
                block = None;
                continue;
            }

            let (directive, rest) = match block {
                Some(d) => (d, code),
                None => match code.split_once(char::is_whitespace) {
                    Some((d, rest)) => (d, rest.trim()),
                    None => (code, ""),
                },
            };

            if block.is_none() && rest == "(" {
                block = Some(directive);
                continue;
            }

            match directive {
                "module" => {
                    raw.module = Some(ModPath {
                        path: unquote(rest).to_string(),
                    });
                }
                "go" => raw.go = Some(rest.to_string()),
                "toolchain" => raw.toolchain = Some(rest.to_string()),
                "require" => {
                    if let Some(r) = parse_require_line(rest, comment) {
                        require.push(r);
                    }
                }
                "replace" => {
                    if let Some(r) = parse_replace_line(rest) {
                        replace.push(r);
                    }
                }
                // exclude, retract, godebug, tool: not part of ModuleInfo
                _ => {}
            }
        }

        raw.require = Some(require);
        raw.replace = Some(replace);
        raw
    }
}

impl ManifestSource for GoModReader {
    fn manifest_json(&self, root: &Path) -> Result<String> {
        let go_mod_path = root.join("go.mod");
        let content = fs::read_to_string(&go_mod_path).map_err(|e| ScanError::path(&go_mod_path, e))?;
        let raw = Self::parse_go_mod(&content);
        serde_json::to_string(&raw).map_err(|e| ScanError::Decode(e.to_string()))
    }
}

/// Split a line into code and the text after `//`.
fn split_comment(line: &str) -> (&str, &str) {
    match line.find("//") {
        Some(idx) => (&line[..idx], line[idx + 2..].trim()),
        None => (line, ""),
    }
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('`')
}

/// Parse a require line: "google.golang.org/grpc v1.78.0"
fn parse_require_line(line: &str, comment: &str) -> Option<Require> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let path = unquote(parts.first()?).to_string();
    if path.is_empty() {
        return None;
    }
    Some(Require {
        path,
        version: parts.get(1).map(|v| v.to_string()).unwrap_or_default(),
        indirect: comment.split(';').any(|c| c.trim() == "indirect"),
    })
}

/// Parse a replace line: "k8s.io/api v0.1.0 => ./staging/src/k8s.io/api"
fn parse_replace_line(line: &str) -> Option<Replace> {
    let (from, to) = line.split_once("=>")?;
    let old = module_version(from)?;
    let new = module_version(to)?;
    Some(Replace { old, new })
}

fn module_version(text: &str) -> Option<ModuleVersion> {
    let mut parts = text.split_whitespace();
    let path = unquote(parts.next()?).to_string();
    if path.is_empty() {
        return None;
    }
    Some(ModuleVersion {
        path,
        version: parts.next().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{decode_manifest, get_module_info};
    use tempfile::TempDir;

    fn sample_go_mod() -> &'static str {
        r#"
module github.com/orzkratos/demokratos/demo2kratos

go 1.22.0

toolchain go1.22.5

require (
	github.com/go-kratos/kratos/v2 v2.8.0
	github.com/google/wire v0.6.0
	google.golang.org/grpc v1.65.0
)

require (
	github.com/go-playground/form/v4 v4.2.1 // indirect
	golang.org/x/sys v0.22.0 // indirect
)

exclude github.com/bad/module v1.0.0

replace (
	example.com/shared => ../shared
	example.com/old v1.0.0 => example.com/new v1.2.0
)
"#
    }

    #[test]
    fn test_parse_go_mod() {
        let raw = GoModReader::parse_go_mod(sample_go_mod());
        assert_eq!(
            raw.module.unwrap().path,
            "github.com/orzkratos/demokratos/demo2kratos"
        );
        assert_eq!(raw.go.as_deref(), Some("1.22.0"));
        assert_eq!(raw.toolchain.as_deref(), Some("go1.22.5"));

        let require = raw.require.unwrap();
        let paths: Vec<_> = require.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "github.com/go-kratos/kratos/v2",
                "github.com/google/wire",
                "google.golang.org/grpc",
                "github.com/go-playground/form/v4",
                "golang.org/x/sys",
            ]
        );
        assert!(!require[0].indirect);
        assert!(require[3].indirect);
        assert_eq!(require[2].version, "v1.65.0");

        let replace = raw.replace.unwrap();
        assert_eq!(replace.len(), 2);
        assert_eq!(replace[0].new.path, "../shared");
        assert_eq!(replace[1].old.version.as_deref(), Some("v1.0.0"));
        assert_eq!(replace[1].new.version.as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn test_single_line_directives() {
        let content = r#"
module "example.com/mymodule" // quoted

go 1.21

require github.com/pkg/errors v0.9.1
replace example.com/old => example.com/new v1.0.0
"#;
        let raw = GoModReader::parse_go_mod(content);
        assert_eq!(raw.module.unwrap().path, "example.com/mymodule");
        assert_eq!(raw.require.unwrap()[0].path, "github.com/pkg/errors");
        assert_eq!(raw.replace.unwrap()[0].old.path, "example.com/old");
    }

    #[test]
    fn test_reader_output_decodes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), sample_go_mod()).unwrap();

        let json = GoModReader.manifest_json(temp.path()).unwrap();
        let info = decode_manifest(&json).unwrap();
        assert_eq!(info.module_path, "github.com/orzkratos/demokratos/demo2kratos");
        assert_eq!(info.dependencies.len(), 5);
        assert_eq!(info.toolchain_version(), "go1.22.5");
    }

    #[test]
    fn test_reader_without_module_is_decode_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), "go 1.22\n").unwrap();

        let err = get_module_info(temp.path(), &GoModReader).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)), "got {:?}", err);
    }

    #[test]
    fn test_reader_missing_go_mod_is_path_error() {
        let temp = TempDir::new().unwrap();
        let err = GoModReader.manifest_json(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::Path { .. }));
    }

    #[test]
    fn test_toolchain_not_found() {
        let temp = TempDir::new().unwrap();
        let source = GoToolchain::new("rpcscan-no-such-go-binary");
        let err = source.manifest_json(temp.path()).unwrap_err();
        assert!(
            matches!(err, ScanError::ToolchainNotFound { ref program } if program == "rpcscan-no-such-go-binary"),
            "got {:?}",
            err
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_toolchain_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        // `false` ignores its arguments and exits 1.
        let err = GoToolchain::new("false").manifest_json(temp.path()).unwrap_err();
        assert!(matches!(err, ScanError::Toolchain(_)), "got {:?}", err);
    }
}
