//! FlowLens Core - Issue Lifecycle Metrics Engine
//!
//! The CLI entry point for fl-core, handling:
//! - Processing an already-fetched issue batch into lifecycle metrics
//! - Batch KPI summaries
//! - Output-schema export for downstream consumers
//! - Workflow config validation
//!
//! Network retrieval, pagination, and presentation are owned by external
//! collaborators; this binary only reads a local JSON batch (or stdin)
//! and writes JSON to stdout.

use clap::{Args, Parser, Subcommand};
use fl_common::error::{format_error_human, StructuredError};
use fl_common::{Error, OutputFormat, Result};
use fl_core::config::WorkflowConfig;
use fl_core::exit_codes::ExitCode;
use fl_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use fl_core::metrics::aggregate::process_batch;
use fl_core::model::input::IssueInput;
use fl_core::output::{output_schema, render, BatchEnvelope};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// FlowLens Core - Issue lifecycle metrics from workflow history
#[derive(Parser)]
#[command(name = "fl-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to workflow config file (flowlens.json)
    #[arg(long, global = true, env = "FL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Minimum log level on stderr (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Errors only on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an issue batch into lifecycle metrics
    Process(ProcessArgs),

    /// Process an issue batch and print only the KPI rollup
    Summary(ProcessArgs),

    /// Print the JSON Schema of the batch output
    Schema,

    /// Validate a workflow config file
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Input batch: JSON array of issue records, or '-' for stdin
    #[arg(long, short = 'i', default_value = "-")]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Config file to validate (defaults to the resolved config)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn read_batch(path: &Path) -> Result<Vec<IssueInput>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| Error::BatchRead(format!("stdin: {}", e)))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| Error::BatchRead(format!("{}: {}", path.display(), e)))?
    };

    serde_json::from_str(&raw).map_err(|e| Error::BatchParse(e.to_string()))
}

fn run_process(global: &GlobalOpts, args: &ProcessArgs, summary_only: bool) -> Result<()> {
    let (config, source) = WorkflowConfig::resolve(global.config.as_deref())?;
    info!(config_source = %source, "resolved workflow config");

    let issues = read_batch(&args.input)?;
    info!(issues = issues.len(), "processing issue batch");

    let envelope = BatchEnvelope::new(process_batch(&issues, &config));

    let format = if summary_only {
        OutputFormat::Summary
    } else {
        global.format
    };
    println!("{}", render(&envelope, format)?);
    Ok(())
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> Result<()> {
    let path = args.config.as_deref().or(global.config.as_deref());
    let (config, source) = WorkflowConfig::resolve(path)?;
    info!(config_source = %source, "workflow config is valid");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests are not argument errors.
            let code = if err.use_stderr() {
                ExitCode::ArgsError.code()
            } else {
                ExitCode::Success.code()
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    // Machine-readable stdout pairs with machine-readable stderr.
    let log_format = cli.global.log_format.or_else(|| {
        matches!(cli.global.format, OutputFormat::Json | OutputFormat::Jsonl)
            .then_some(LogFormat::Jsonl)
    });
    init_logging(&LogConfig::from_env(
        log_format,
        cli.global.log_level,
        cli.global.quiet,
    ));

    let result = match &cli.command {
        Commands::Process(args) => run_process(&cli.global, args, false),
        Commands::Summary(args) => run_process(&cli.global, args, true),
        Commands::Schema => output_schema().map(|schema| println!("{}", schema)),
        Commands::Check(args) => run_check(&cli.global, args),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            match cli.global.format {
                OutputFormat::Json | OutputFormat::Jsonl => {
                    eprintln!("{}", StructuredError::from(&err).to_json());
                }
                _ => {
                    eprintln!("{}", format_error_human(&err, !cli.global.no_color));
                }
            }
            ExitCode::from(&err)
        }
    };

    std::process::exit(exit_code.code());
}
