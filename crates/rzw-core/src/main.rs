//! rzw - rebuild a program's process tree and file accesses from a
//! Process Monitor CSV export.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rzw_common::{Error, OutputFormat, Result};
use rzw_config::{load_config, LoadedConfig, CONFIG_SCHEMA_VERSION};
use rzw_core::exit_codes::ExitCode;
use rzw_core::logging::{event_names, init_logging, LogConfig, LogFormat, LogLevel};
use rzw_core::{JsonlStore, MemoryStore, TraceReader, TraceSummary};

/// Windows trace reconstruction from Process Monitor logs
#[derive(Parser)]
#[command(name = "rzw")]
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
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the trace of one program from a CSV export
    Trace(TraceArgs),

    /// Show the effective configuration and where it came from
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// CSV export to read, or '-' for stdin
    input: String,

    /// Base name of the monitored executable (e.g. python.exe)
    #[arg(long, short = 'e')]
    executable: Option<String>,

    /// Write the trace here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Configuration file (default: $RZW_CONFIG, then the config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "json")]
    format: OutputFormat,

    /// Do not check the local filesystem for directories
    #[arg(long)]
    no_probe: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Configuration file (default: $RZW_CONFIG, then the config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_flags(cli.global.quiet, cli.global.verbose);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match cli.command {
        Commands::Trace(args) => run_trace(&args),
        Commands::Config(args) => run_config(&args),
        Commands::Version => {
            print_version();
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_trace(args: &TraceArgs) -> ExitCode {
    match trace(args) {
        Ok(()) => ExitCode::Clean,
        Err(err) => report_error(&err),
    }
}

fn trace(args: &TraceArgs) -> Result<()> {
    let loaded = load(args.config.as_deref())?;
    let mut config = loaded.config;
    if let Some(executable) = &args.executable {
        config = config.with_executable(executable.clone());
    }
    if config.executable.is_none() {
        return Err(Error::Config(
            "no executable to trace; pass --executable or set \"executable\" in the config file"
                .to_string(),
        ));
    }
    if args.no_probe {
        config = config.with_probe_directories(false);
    }

    let mut out = open_output(args.output.as_ref())?;
    match args.format {
        OutputFormat::Jsonl => {
            let mut reader = TraceReader::new(JsonlStore::new(&mut out), &config)?;
            read_input(&mut reader, &args.input)?;
            let store = reader.into_store();
            let lines = store.lines_written();
            store.finish()?;
            tracing::debug!(event = event_names::OUTPUT_WRITTEN, lines, "trace written");
        }
        OutputFormat::Json => {
            let mut reader = TraceReader::new(MemoryStore::new(), &config)?;
            let summary = read_input(&mut reader, &args.input)?;
            let events = reader.into_store().into_events();
            let document = serde_json::json!({
                "summary": summary,
                "events": events,
            });
            serde_json::to_writer_pretty(&mut out, &document)?;
            writeln!(out)?;
        }
        OutputFormat::Summary => {
            let mut reader = TraceReader::new(MemoryStore::new(), &config)?;
            let summary = read_input(&mut reader, &args.input)?;
            write_summary(&mut out, &summary)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn read_input<S: rzw_core::TraceStore>(
    reader: &mut TraceReader<S>,
    input: &str,
) -> Result<TraceSummary> {
    if input == "-" {
        reader.read(io::stdin().lock(), "<stdin>")
    } else {
        reader.read_path(input)
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    })
}

fn write_summary(out: &mut dyn Write, summary: &TraceSummary) -> Result<()> {
    let run = summary
        .run_id
        .as_ref()
        .map(|run| run.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "[{}] {} rows, {} in scope, {} processes, {} file accesses",
        run, summary.rows, summary.in_scope_rows, summary.processes, summary.file_accesses
    )?;
    match summary.root_pid {
        Some(pid) => writeln!(out, "root pid: {}", pid)?,
        None => writeln!(out, "root process not found")?,
    }
    if !summary.diagnostics.is_clean() {
        write!(out, "{}", summary.diagnostics.render())?;
    }
    Ok(())
}

fn load(path: Option<&std::path::Path>) -> Result<LoadedConfig> {
    let loaded = load_config(path).map_err(|e| Error::Config(e.to_string()))?;
    match &loaded.path {
        Some(path) => tracing::debug!(
            event = event_names::CONFIG_LOADED,
            path = %path.display(),
            source = %loaded.source,
            "configuration loaded"
        ),
        None => tracing::debug!(
            event = event_names::CONFIG_DEFAULT_USED,
            "using built-in configuration"
        ),
    }
    Ok(loaded)
}

fn run_config(args: &ConfigArgs) -> ExitCode {
    let loaded = match load(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => return report_error(&err),
    };
    let response = serde_json::json!({
        "source": loaded.source.to_string(),
        "path": loaded.path.as_ref().map(|p| p.display().to_string()),
        "config": loaded.config,
    });
    match serde_json::to_string_pretty(&response) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Clean
        }
        Err(err) => report_error(&Error::Json(err)),
    }
}

fn print_version() {
    println!("rzw {}", env!("CARGO_PKG_VERSION"));
    println!("config schema version: {}", CONFIG_SCHEMA_VERSION);
}

fn report_error(err: &Error) -> ExitCode {
    let exit_code = ExitCode::from_error(err);
    tracing::debug!(code = err.code(), category = %err.category(), "command failed");
    eprintln!("Error: {}", err);
    eprintln!("Fix: {}", err.remediation());
    exit_code
}
