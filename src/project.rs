//! Project-level aggregation.
//!
//! Combines module metadata with three independent scans of the project's
//! API directory (clients, servers, services) into one `ProjectReport`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::matchers::{Definition, Matcher, RoleMatcher, ServiceMatcher};
use crate::module::{get_module_info, GoModReader, GoToolchain, ManifestSource, ModuleInfo};
use crate::options::{ManifestMode, ScanOptions};
use crate::scan::Scanner;

/// Aggregate result of analyzing one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub module_info: ModuleInfo,
    pub clients: Vec<Definition>,
    pub servers: Vec<Definition>,
    pub services: Vec<Definition>,
}

/// Builds a `ProjectReport` for a project root.
pub struct ProjectAnalyzer {
    options: ScanOptions,
    source: Box<dyn ManifestSource>,
}

impl ProjectAnalyzer {
    /// Create an analyzer whose manifest source follows `options.manifest`.
    pub fn new(options: ScanOptions) -> Self {
        let source = manifest_source(&options);
        Self { options, source }
    }

    /// Replace the manifest collaborator.
    pub fn with_source(mut self, source: Box<dyn ManifestSource>) -> Self {
        self.source = source;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// The directory holding API definitions for `root`.
    pub fn api_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.options.api_dir)
    }

    /// Analyze the project at `root`.
    ///
    /// Module metadata failures fail the whole call. A missing API
    /// directory or a scan with no matches leaves the lists empty.
    pub fn analyze(&self, root: &Path) -> Result<ProjectReport> {
        self.options.validate()?;
        let module_info = get_module_info(root, self.source.as_ref())?;
        if self.options.debug {
            debug!(
                module = %module_info.module_path,
                go = %module_info.language_version,
                dependencies = module_info.dependencies.len(),
                "decoded module manifest"
            );
        }

        let api_dir = self.api_dir(root);
        if !api_dir.is_dir() {
            if self.options.debug {
                debug!(api_dir = %api_dir.display(), "no API directory, RPC lists left empty");
            }
            return Ok(ProjectReport {
                module_info,
                clients: Vec::new(),
                servers: Vec::new(),
                services: Vec::new(),
            });
        }

        let scanner = Scanner::new(&self.options)?;
        let list = |matcher: &dyn Matcher| -> Result<Vec<Definition>> {
            scanner.scan(&api_dir, matcher).map(|scan| scan.definitions)
        };
        let clients = RoleMatcher::clients();
        let servers = RoleMatcher::servers();
        let services = ServiceMatcher;

        let (clients, (servers, services)) = if self.options.parallel {
            rayon::join(
                || list(&clients),
                || rayon::join(|| list(&servers), || list(&services)),
            )
        } else {
            (list(&clients), (list(&servers), list(&services)))
        };

        Ok(ProjectReport {
            module_info,
            clients: clients?,
            servers: servers?,
            services: services?,
        })
    }
}

/// The manifest collaborator selected by the options.
pub fn manifest_source(options: &ScanOptions) -> Box<dyn ManifestSource> {
    match options.manifest {
        ManifestMode::Toolchain => Box::new(GoToolchain::new(options.go_binary.clone())),
        ManifestMode::Gomod => Box::new(GoModReader),
    }
}

/// Analyze the project at `root` with the configured manifest source.
pub fn analyze_project(root: &Path, options: &ScanOptions) -> Result<ProjectReport> {
    ProjectAnalyzer::new(options.clone()).analyze(root)
}
