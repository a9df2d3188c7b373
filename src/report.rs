//! Output formatting for rpcscan results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::collections::BTreeMap;
use std::io::Write;

use colored::*;
use serde::Serialize;

use crate::matchers::Definition;
use crate::module::ModuleInfo;
use crate::project::ProjectReport;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            _ => Err(format!("invalid format {:?}, must be 'pretty' or 'json'", s)),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Write any serializable result as pretty-printed JSON.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a project report in human-readable form.
pub fn write_pretty<W: Write>(out: &mut W, root: &str, report: &ProjectReport) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} v{}", "rpcscan".cyan().bold(), env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Project:  ".dimmed(), root)?;
    writeln!(out)?;

    write_module(out, &report.module_info)?;
    writeln!(out)?;

    write_section(out, "Services", &report.services)?;
    write_section(out, "Clients", &report.clients)?;
    write_section(out, "Servers", &report.servers)?;
    Ok(())
}

/// Write module metadata.
pub fn write_module<W: Write>(out: &mut W, info: &ModuleInfo) -> anyhow::Result<()> {
    writeln!(out, "  {}{}", "Module:   ".dimmed(), info.module_path.bold())?;
    writeln!(out, "  {}{}", "Go:       ".dimmed(), or_unset(&info.language_version))?;
    writeln!(out, "  {}{}", "Toolchain: ".dimmed(), or_unset(info.toolchain_version()))?;

    let direct = info.direct_dependencies().count();
    writeln!(
        out,
        "  {}{} {}",
        "Requires: ".dimmed(),
        info.dependencies.len(),
        format!("({} direct)", direct).dimmed()
    )?;
    for dep in &info.dependencies {
        let line = format!("{} {}", dep.path, dep.version);
        if dep.indirect {
            writeln!(out, "    {}", line.dimmed())?;
        } else {
            writeln!(out, "    {}", line)?;
        }
    }

    for rep in &info.replacements {
        writeln!(
            out,
            "    {} {} {}",
            rep.old_path.yellow(),
            "=>".dimmed(),
            rep.new_path
        )?;
    }
    Ok(())
}

/// Write a titled list of definitions.
pub fn write_section<W: Write>(out: &mut W, title: &str, defs: &[Definition]) -> anyhow::Result<()> {
    writeln!(out, "  {} {}", title.bold(), format!("({})", defs.len()).dimmed())?;
    if defs.is_empty() {
        writeln!(out, "    {}", "none".dimmed())?;
    }
    for def in defs {
        writeln!(
            out,
            "    {}.{}  {}",
            def.package.dimmed(),
            def.name.green(),
            def.location.to_string().dimmed()
        )?;
    }
    writeln!(out)?;
    Ok(())
}

/// Write a struct map with each struct's declaration text.
pub fn write_structs<W: Write>(
    out: &mut W,
    structs: &BTreeMap<String, Definition>,
) -> anyhow::Result<()> {
    writeln!(out, "  {} {}", "Structs".bold(), format!("({})", structs.len()).dimmed())?;
    for (name, def) in structs {
        writeln!(out)?;
        writeln!(out, "  {}  {}", name.green(), def.location.to_string().dimmed())?;
        if let Some(text) = &def.raw_text {
            for line in text.lines() {
                writeln!(out, "    {}", line)?;
            }
        }
    }
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::SourceLocation;
    use crate::module::Dependency;
    use std::path::PathBuf;

    fn definition(name: &str) -> Definition {
        Definition {
            name: name.to_string(),
            package: "v1".to_string(),
            location: SourceLocation {
                path: PathBuf::from("api/helloworld/v1/greeter_grpc.pb.go"),
                line: 21,
                column: 1,
            },
            raw_text: None,
        }
    }

    fn report() -> ProjectReport {
        ProjectReport {
            module_info: ModuleInfo {
                module_path: "example.com/demo".to_string(),
                language_version: "1.22".to_string(),
                toolchain: String::new(),
                dependencies: vec![Dependency {
                    path: "google.golang.org/grpc".to_string(),
                    version: "v1.65.0".to_string(),
                    indirect: false,
                }],
                replacements: Vec::new(),
            },
            clients: vec![definition("GreeterClient")],
            servers: vec![definition("GreeterServer")],
            services: vec![definition("Greeter")],
        }
    }

    #[test]
    fn test_json_report_structure() {
        let mut buf = Vec::new();
        write_json(&mut buf, &report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["module_info"]["module_path"], "example.com/demo");
        assert_eq!(value["services"][0]["name"], "Greeter");
        assert_eq!(value["clients"][0]["location"]["line"], 21);
        assert!(value["clients"][0].get("raw_text").is_none());
    }

    #[test]
    fn test_pretty_report_mentions_everything() {
        let mut buf = Vec::new();
        write_pretty(&mut buf, "demo", &report()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        for needle in ["example.com/demo", "GreeterClient", "GreeterServer", "Greeter", "v1.65.0"] {
            assert!(text.contains(needle), "missing {needle} in:\n{text}");
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("pretty".parse::<Format>().unwrap(), Format::Pretty);
        assert!("sarif".parse::<Format>().is_err());
    }
}
