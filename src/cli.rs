//! Command-line interface for rpcscan.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::grpc;
use crate::module::get_module_info;
use crate::options::{ManifestMode, ScanOptions, DEFAULT_CONFIG_NAMES};
use crate::project::{manifest_source, ProjectAnalyzer};
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Static analysis of Go gRPC projects.
///
/// Reports gRPC client and server interfaces, service names, struct
/// definitions, and go.mod metadata without compiling the project.
#[derive(Parser)]
#[command(name = "rpcscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log every matched definition and skipped file
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to options YAML file (default: auto-discover)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a whole project: module metadata plus its API surface
    Analyze(AnalyzeArgs),
    /// List one kind of gRPC definition under a directory
    List(ListArgs),
    /// Show the structs declared in one file
    Structs(StructsArgs),
    /// Show module metadata
    Module(ModuleArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Project root (directory holding go.mod)
    pub root: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Manifest source: toolchain (go mod edit -json) or gomod (read go.mod)
    #[arg(short, long)]
    pub manifest: Option<ManifestMode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Clients,
    Servers,
    Services,
    Unimplemented,
    Registrars,
}

/// Arguments for the list command.
#[derive(Parser)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub kind: ListKind,

    /// Directory to scan recursively
    pub dir: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the structs command.
#[derive(Parser)]
pub struct StructsArgs {
    /// Go source file
    pub file: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the module command.
#[derive(Parser)]
pub struct ModuleArgs {
    /// Project root (directory holding go.mod)
    pub root: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Manifest source: toolchain or gomod
    #[arg(short, long)]
    pub manifest: Option<ManifestMode>,
}

/// Discover an options file in the current directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Build scan options from the config file and global flags.
pub fn load_options(cli: &Cli) -> anyhow::Result<ScanOptions> {
    let path = cli.config.clone().or_else(discover_config);
    let options = match path {
        Some(path) => ScanOptions::parse_file(&path)
            .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?,
        None => ScanOptions::default(),
    };
    // The flag can only turn debug on; a config file may already have.
    let debug = options.debug || cli.debug;
    Ok(options.with_debug(debug))
}

fn parse_format(format: &str) -> Option<Format> {
    match format.parse() {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

fn with_manifest(options: &ScanOptions, manifest: Option<ManifestMode>) -> ScanOptions {
    match manifest {
        Some(mode) => options.clone().with_manifest(mode),
        None => options.clone(),
    }
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, options: &ScanOptions) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };
    let options = with_manifest(options, args.manifest);

    let report = match ProjectAnalyzer::new(options).analyze(&args.root) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut out = io::stdout().lock();
    match format {
        Format::Json => report::write_json(&mut out, &report)?,
        Format::Pretty => report::write_pretty(&mut out, &args.root.to_string_lossy(), &report)?,
    }
    out.flush()?;
    Ok(EXIT_SUCCESS)
}

/// Run one directory query by kind.
pub fn list(kind: ListKind, dir: &Path, options: &ScanOptions) -> crate::Result<Vec<crate::Definition>> {
    match kind {
        ListKind::Clients => grpc::list_grpc_clients(dir, options),
        ListKind::Servers => grpc::list_grpc_servers(dir, options),
        ListKind::Services => grpc::list_grpc_services(dir, options),
        ListKind::Unimplemented => grpc::list_grpc_unimplemented_servers(dir, options),
        ListKind::Registrars => grpc::list_grpc_registrars(dir, options),
    }
}

/// Run the list command.
pub fn run_list(args: &ListArgs, options: &ScanOptions) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };

    let defs = match list(args.kind, &args.dir, options) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut out = io::stdout().lock();
    match format {
        Format::Json => report::write_json(&mut out, &defs)?,
        Format::Pretty => {
            let title = format!("{:?}", args.kind);
            report::write_section(&mut out, &title, &defs)?;
        }
    }
    out.flush()?;
    Ok(EXIT_SUCCESS)
}

/// Run the structs command.
pub fn run_structs(args: &StructsArgs, options: &ScanOptions) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };

    let structs = match grpc::get_structs_map(&args.file, options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut out = io::stdout().lock();
    match format {
        Format::Json => report::write_json(&mut out, &structs)?,
        Format::Pretty => report::write_structs(&mut out, &structs)?,
    }
    out.flush()?;
    Ok(EXIT_SUCCESS)
}

/// Run the module command.
pub fn run_module(args: &ModuleArgs, options: &ScanOptions) -> anyhow::Result<i32> {
    let Some(format) = parse_format(&args.format) else {
        return Ok(EXIT_ERROR);
    };
    let options = with_manifest(options, args.manifest);
    let source = manifest_source(&options);

    let info = match get_module_info(&args.root, source.as_ref()) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut out = io::stdout().lock();
    match format {
        Format::Json => report::write_json(&mut out, &info)?,
        Format::Pretty => report::write_module(&mut out, &info)?,
    }
    out.flush()?;
    Ok(EXIT_SUCCESS)
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli, options: &ScanOptions) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Analyze(args) => run_analyze(args, options),
        Commands::List(args) => run_list(args, options),
        Commands::Structs(args) => run_structs(args, options),
        Commands::Module(args) => run_module(args, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "rpcscan", "--debug", "analyze", "demo", "--format", "json", "--manifest", "gomod",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.root, PathBuf::from("demo"));
                assert_eq!(args.format, "json");
                assert_eq!(args.manifest, Some(ManifestMode::Gomod));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_list_kind() {
        let cli = Cli::try_parse_from(["rpcscan", "list", "unimplemented", "api"]).unwrap();
        match cli.command {
            Commands::List(args) => assert_eq!(args.kind, ListKind::Unimplemented),
            _ => panic!("expected list"),
        }
        assert!(Cli::try_parse_from(["rpcscan", "list", "widgets", "api"]).is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = temp.path().join("custom.yaml");
        std::fs::write(&config, "api_dir: proto\nparallel: true\n").unwrap();

        let cli = Cli::try_parse_from([
            "rpcscan",
            "--config",
            config.to_str().unwrap(),
            "--debug",
            "module",
            ".",
        ])
        .unwrap();
        let options = load_options(&cli).unwrap();
        assert_eq!(options.api_dir, "proto");
        assert!(options.parallel);
        assert!(options.debug);
    }

    #[test]
    fn test_bad_format_is_error_exit() {
        let args = StructsArgs {
            file: PathBuf::from("missing.go"),
            format: "sarif".to_string(),
        };
        assert_eq!(run_structs(&args, &ScanOptions::default()).unwrap(), EXIT_ERROR);
    }
}
