#![warn(missing_docs)]
//! SatRun CLI Library
//!
//! Command line for accelerator simulation studies. Use `satrun::run()` (or
//! `satrun_cli::run()`) in a main function to get the full CLI:
//!
//! - `report`: aggregate every `statistics.json` of the study into tables
//! - `init`: scaffold one run directory per configuration from templates
//! - `archive`: move all configuration directories under `archive/`
//! - `config`: print a default `satrun.toml`

mod archive;
mod config;
mod planner;
mod scaffold;

pub use archive::{ARCHIVE_DIR, ArchiveMove, archive_study};
pub use config::*;
pub use planner::{Selection, build_study};
pub use scaffold::{
    SIMULATOR_CONFIG, ScaffoldOptions, TEMPLATE_FILES, rewrite_simulator_config,
    scaffold_configuration, scaffold_study,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use satrun_report::{OutputFormat, generate_report};
use satrun_stats::{Study, aggregate_study};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// SatRun CLI arguments
#[derive(Parser, Debug)]
#[command(name = "satrun")]
#[command(author, version, about = "SatRun - simulation study run tooling")]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file; defaults to the nearest satrun.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate statistics into per-metric tables
    Report(ReportArgs),
    /// Create run directories from the templates
    Init(InitArgs),
    /// Move run directories under archive/
    Archive(ArchiveArgs),
    /// Print a default satrun.toml
    Config,
}

/// Arguments of `satrun report`
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Runs directory (overrides study.runs_dir)
    #[arg(long, value_name = "DIR")]
    pub runs_dir: Option<PathBuf>,

    /// Output format: text, json, csv, markdown
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only report this configuration (repeatable)
    #[arg(long = "config", value_name = "LABEL")]
    pub configurations: Vec<String>,

    /// Only report instances matching this regex
    #[arg(long)]
    pub filter: Option<String>,
}

/// Arguments of `satrun init`
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Runs directory (overrides study.runs_dir)
    #[arg(long, value_name = "DIR")]
    pub runs_dir: Option<PathBuf>,

    /// Template directory (overrides scaffold.template_dir)
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Only scaffold this configuration (repeatable)
    #[arg(long = "config", value_name = "LABEL")]
    pub configurations: Vec<String>,
}

/// Arguments of `satrun archive`
#[derive(Args, Debug, Default)]
pub struct ArchiveArgs {
    /// Runs directory (overrides study.runs_dir)
    #[arg(long, value_name = "DIR")]
    pub runs_dir: Option<PathBuf>,

    /// Only archive this configuration (repeatable)
    #[arg(long = "config", value_name = "LABEL")]
    pub configurations: Vec<String>,
}

/// Run the SatRun CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or the first fatal error.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the SatRun CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if let Commands::Config = cli.command {
        print!("{}", SatrunConfig::default_toml());
        return Ok(());
    }

    // satrun.toml (explicit or discovered), CLI flags override below
    let (config, config_path) = SatrunConfig::resolve(cli.config_file.as_deref())?;
    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded configuration"),
        None => tracing::debug!("no satrun.toml found, using defaults"),
    }

    match cli.command {
        Commands::Report(args) => report_command(&args, &config),
        Commands::Init(args) => init_command(&args, &config),
        Commands::Archive(args) => archive_command(&args, &config),
        Commands::Config => Ok(()),
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default = if verbose { "satrun=debug" } else { "satrun=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when called more than once in-process
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Build the study for a command from the configuration and CLI overrides
pub fn resolve_study(
    config: &SatrunConfig,
    runs_dir: Option<&Path>,
    selection: &Selection<'_>,
) -> anyhow::Result<Study> {
    let runs_dir = runs_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.study.runs_dir));
    build_study(
        &runs_dir,
        &config.study.configurations,
        &config.study.instances,
        selection,
    )
}

/// Aggregate a study and render it; nothing is returned unless every run loaded
pub fn render_report(study: &Study, format: OutputFormat) -> anyhow::Result<String> {
    let aggregate = aggregate_study(study)?;
    let output = generate_report(&aggregate, format)?;
    Ok(output)
}

fn report_command(args: &ReportArgs, config: &SatrunConfig) -> anyhow::Result<()> {
    let format: OutputFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    let selection = Selection {
        configurations: &args.configurations,
        filter: args.filter.as_deref(),
    };
    let study = resolve_study(config, args.runs_dir.as_deref(), &selection)?;

    let output = render_report(&study, format)?;

    let path = args
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    if let Some(path) = path {
        std::fs::write(&path, output.as_bytes())
            .with_context(|| format!("cannot write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), %format, "report written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(output.as_bytes())?;
        handle.flush()?;
    }

    Ok(())
}

fn init_command(args: &InitArgs, config: &SatrunConfig) -> anyhow::Result<()> {
    let selection = Selection {
        configurations: &args.configurations,
        filter: None,
    };
    let study = resolve_study(config, args.runs_dir.as_deref(), &selection)?;

    let options = ScaffoldOptions {
        template_dir: args
            .template_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.scaffold.template_dir)),
        l3_cache_type: config.scaffold.l3_cache_type.clone(),
        ramu_cache_config: config.scaffold.ramu_cache_config.clone(),
    };

    let dirs = scaffold_study(&study, &options)?;
    tracing::info!(directories = dirs.len(), "scaffolding complete");
    Ok(())
}

fn archive_command(args: &ArchiveArgs, config: &SatrunConfig) -> anyhow::Result<()> {
    let selection = Selection {
        configurations: &args.configurations,
        filter: None,
    };
    let study = resolve_study(config, args.runs_dir.as_deref(), &selection)?;

    archive_study(&study, |moved| println!("{}", moved))?;
    Ok(())
}
