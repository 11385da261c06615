//! Command-line interface for swallowcheck.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::check::Runner;
use crate::config::{self, Config};
use crate::frontend;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Find exception handlers that hide the exceptions they catch.
///
/// A handler clause hides its exception unless it rethrows it or throws a
/// new error. Handlers that log, return a default or do nothing at all are
/// reported.
#[derive(Parser)]
#[command(name = "swallowcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by SWALLOWCHECK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report exception hiding handlers in a file or directory
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Write a default swallowcheck config file
    Init(InitArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Sarif,
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Show suppressed diagnostics in output
    #[arg(long)]
    pub show_suppressed: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "swallowcheck.yaml")]
    pub output: PathBuf,
}

/// Directory names that hold tests.
const TEST_DIRS: &[&str] = &["test", "tests", "__tests__", "__test__", "testdata", "test_data"];

/// Whether a file name looks like a test source.
fn is_test_file(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.ends_with("_tests")
        || stem.ends_with("Test")
        || stem.ends_with("Tests")
        || name.contains(".test.")
        || name.contains(".spec.")
}

/// Collect files to scan under `root`.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let include_tests = config.should_include_test_files();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Skip hidden and dependency directories
            if name.starts_with('.') || name == "vendor" || name == "node_modules" {
                return false;
            }
            include_tests || !TEST_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if frontend::for_path(path).is_none() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(relative) {
            tracing::debug!(file = %relative.display(), "excluded by config");
            continue;
        }

        if !include_tests {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if is_test_file(name) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Load the config named on the command line, or discover one.
fn load_config(explicit: Option<&Path>, scan_root: &Path) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let dir = if scan_root.is_dir() {
                scan_root
            } else {
                scan_root.parent().unwrap_or(Path::new("."))
            };
            config::discover(dir).or_else(|| config::discover(Path::new(".")))
        }
    };

    let Some(path) = path else {
        tracing::debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    let config = Config::parse_file(&path)?;
    config::validate(&config)?;
    tracing::debug!(config = %path.display(), "loaded config");
    Ok(config)
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let config = match load_config(args.config.as_deref(), &abs_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid config: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Collect files to scan
    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &config)?
    } else {
        vec![abs_path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }
    tracing::info!(files = files.len(), root = %abs_path.display(), "checking files");

    let fail_on = config.fail_on();
    let severity = config.severity();
    let result = Runner::new().with_config(config).check(&files)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => report::write_json(&mut out, &abs_path, &result, fail_on)?,
        OutputFormat::Sarif => report::write_sarif(&mut out, &abs_path, &result, severity)?,
        OutputFormat::Pretty => {
            report::write_pretty(&mut out, &abs_path, &result, fail_on, args.show_suppressed)?
        }
    }
    out.flush()?;

    if result.fails(fail_on) {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::DEFAULT_CONFIG) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: swallowcheck lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
