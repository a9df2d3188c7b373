//! Scan configuration.
//!
//! `ScanOptions` is built once (defaults, a YAML file, or CLI flags) and then
//! passed by reference into every scan. The `debug` field is the verbosity
//! switch: nothing reads it from process-global state.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Default config file names looked up by the CLI.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["rpcscan.yaml", ".rpcscan.yaml"];

/// Which collaborator supplies the module manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestMode {
    /// Run `go mod edit -json` in the project root.
    #[default]
    Toolchain,
    /// Read go.mod directly, no Go installation needed.
    Gomod,
}

impl std::str::FromStr for ManifestMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toolchain" => Ok(ManifestMode::Toolchain),
            "gomod" => Ok(ManifestMode::Gomod),
            _ => Err(format!("unknown manifest mode: {}", s)),
        }
    }
}

/// Options shared by all scanning calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Verbose diagnostics for every scan that receives these options.
    pub debug: bool,
    /// API definitions subdirectory, relative to the project root.
    pub api_dir: String,
    /// Glob patterns for files to leave out of directory scans.
    pub exclude: Vec<String>,
    pub manifest: ManifestMode,
    /// Program used for `mod edit -json`.
    pub go_binary: String,
    /// Run the aggregator's three scans concurrently.
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            debug: false,
            api_dir: "api".to_string(),
            exclude: Vec::new(),
            manifest: ManifestMode::Toolchain,
            go_binary: "go".to_string(),
            parallel: false,
        }
    }
}

impl ScanOptions {
    /// Load options from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let options: ScanOptions = serde_yaml::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_manifest(mut self, manifest: ManifestMode) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Check that the options can be used for a scan.
    pub fn validate(&self) -> Result<()> {
        if self.api_dir.trim().is_empty() {
            return Err(ScanError::Config("api_dir must not be empty".to_string()));
        }
        if self.go_binary.trim().is_empty() {
            return Err(ScanError::Config("go_binary must not be empty".to_string()));
        }
        self.exclude_set().map(|_| ())
    }

    /// Compile the exclude patterns.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .map_err(|e| ScanError::Config(format!("exclude pattern {:?}: {}", pattern, e)))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ScanError::Config(format!("exclude patterns: {}", e)))
    }
}
