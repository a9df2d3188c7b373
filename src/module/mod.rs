//! Go module metadata.
//!
//! The manifest arrives as the JSON document printed by `go mod edit -json`
//! (or the same shape rendered from go.mod by `GoModReader`) and is decoded
//! into `ModuleInfo`. A module without a path is rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

mod source;

pub use source::{GoModReader, GoToolchain, ManifestSource};

/// Raw `go mod edit -json` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoModJson {
    #[serde(default)]
    pub module: Option<ModPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<String>,
    #[serde(default)]
    pub require: Option<Vec<Require>>,
    #[serde(default)]
    pub replace: Option<Vec<Replace>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModPath {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Require {
    pub path: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indirect: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Replace {
    pub old: ModuleVersion,
    pub new: ModuleVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleVersion {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

/// A replace directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub old_path: String,
    pub old_version: Option<String>,
    /// Module path or local directory.
    pub new_path: String,
    pub new_version: Option<String>,
}

/// Project-level module metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Module identity, never empty.
    pub module_path: String,
    /// The `go` directive; empty when unset.
    pub language_version: String,
    /// The `toolchain` directive; empty when unset.
    pub toolchain: String,
    /// Require entries in declaration order.
    pub dependencies: Vec<Dependency>,
    pub replacements: Vec<Replacement>,
}

impl ModuleInfo {
    /// Effective toolchain version: the toolchain directive when present,
    /// otherwise the language version.
    pub fn toolchain_version(&self) -> &str {
        if self.toolchain.is_empty() {
            &self.language_version
        } else {
            &self.toolchain
        }
    }

    /// Dependencies not marked `// indirect`.
    pub fn direct_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|d| !d.indirect)
    }
}

impl TryFrom<GoModJson> for ModuleInfo {
    type Error = ScanError;

    fn try_from(raw: GoModJson) -> Result<Self> {
        let module_path = raw
            .module
            .map(|m| m.path.trim().to_string())
            .unwrap_or_default();
        if module_path.is_empty() {
            return Err(ScanError::Decode("module path is missing".to_string()));
        }

        let dependencies = raw
            .require
            .unwrap_or_default()
            .into_iter()
            .map(|r| Dependency {
                path: r.path,
                version: r.version,
                indirect: r.indirect,
            })
            .collect();

        let replacements = raw
            .replace
            .unwrap_or_default()
            .into_iter()
            .map(|r| Replacement {
                old_path: r.old.path,
                old_version: r.old.version,
                new_path: r.new.path,
                new_version: r.new.version,
            })
            .collect();

        Ok(Self {
            module_path,
            language_version: raw.go.unwrap_or_default(),
            toolchain: raw.toolchain.unwrap_or_default(),
            dependencies,
            replacements,
        })
    }
}

/// Decode manifest JSON into `ModuleInfo`.
pub fn decode_manifest(json: &str) -> Result<ModuleInfo> {
    let raw: GoModJson =
        serde_json::from_str(json).map_err(|e| ScanError::Decode(e.to_string()))?;
    ModuleInfo::try_from(raw)
}

/// Obtain module metadata for the project at `root`.
pub fn get_module_info(root: &Path, source: &dyn ManifestSource) -> Result<ModuleInfo> {
    let json = source.manifest_json(root)?;
    decode_manifest(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDIT_JSON: &str = r#"{
	"Module": {
		"Path": "example.com/demo"
	},
	"Go": "1.22",
	"Toolchain": "go1.22.5",
	"Require": [
		{
			"Path": "github.com/go-kratos/kratos/v2",
			"Version": "v2.8.0"
		},
		{
			"Path": "google.golang.org/protobuf",
			"Version": "v1.34.1",
			"Indirect": true
		}
	],
	"Exclude": null,
	"Replace": [
		{
			"Old": {
				"Path": "example.com/shared"
			},
			"New": {
				"Path": "../shared"
			}
		}
	],
	"Retract": null
}"#;

    #[test]
    fn test_decode_edit_json() {
        let info = decode_manifest(EDIT_JSON).unwrap();
        assert_eq!(info.module_path, "example.com/demo");
        assert_eq!(info.language_version, "1.22");
        assert_eq!(info.toolchain, "go1.22.5");
        assert_eq!(info.dependencies.len(), 2);
        assert_eq!(info.dependencies[0].path, "github.com/go-kratos/kratos/v2");
        assert!(info.dependencies[1].indirect);
        assert_eq!(info.direct_dependencies().count(), 1);
        assert_eq!(info.replacements[0].new_path, "../shared");
        assert_eq!(info.replacements[0].old_version, None);
    }

    #[test]
    fn test_toolchain_version_preference() {
        let mut info = decode_manifest(EDIT_JSON).unwrap();
        assert_eq!(info.toolchain_version(), "go1.22.5");
        info.toolchain.clear();
        assert_eq!(info.toolchain_version(), "1.22");
    }

    #[test]
    fn test_missing_module_path_is_decode_error() {
        let err = decode_manifest(r#"{"Module": {"Path": ""}, "Go": "1.22"}"#).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));

        let err = decode_manifest(r#"{"Go": "1.22"}"#).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = decode_manifest("go: cannot find main module").unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }

    #[test]
    fn test_null_lists() {
        let info = decode_manifest(
            r#"{"Module": {"Path": "example.com/x"}, "Go": "1.21", "Require": null, "Replace": null}"#,
        )
        .unwrap();
        assert!(info.dependencies.is_empty());
        assert!(info.replacements.is_empty());
        assert_eq!(info.toolchain_version(), "1.21");
    }

    struct Fixed(&'static str);

    impl ManifestSource for Fixed {
        fn manifest_json(&self, _root: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_get_module_info_decodes_source_output() {
        let info = get_module_info(Path::new("."), &Fixed(EDIT_JSON)).unwrap();
        assert_eq!(info.module_path, "example.com/demo");
        assert_eq!(info.dependencies.len(), 2);

        let err = get_module_info(Path::new("."), &Fixed(r#"{"Go": "1.22"}"#)).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }
}
