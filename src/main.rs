//! codebatcher - Scan a project and export selected files as line-sized batches.
//!
//! Usage:
//!   codebatcher scan [PATH]                      Print the filtered project tree
//!   codebatcher batch -r REQUEST.json            Print the batch summary
//!   codebatcher download -r REQUEST.json         Write the combined document
//!   codebatcher download-batches -r REQUEST.json Zip the batches
//!   codebatcher aggregate [PATH]                 Zip every file of a project
//!   codebatcher --help                           Show help

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Report, Result};
use serde::Serialize;

use codebatcher_batch::BatchPipeline;
use codebatcher_core::{
    AggregateRequest, BatchRequest, ErrorCategory, InputError, Node, ScanConfig, ScanError,
};
use codebatcher_export::{
    ArchiveError, ArchiveKind, write_archive_file, write_text, write_text_file,
};
use codebatcher_scan::TreeScanner;

#[derive(Parser)]
#[command(
    name = "codebatcher",
    version,
    about = "Scan a project and export selected files as line-sized batches",
    long_about = "codebatcher walks a project, lets you pick files from the filtered tree, \
                  and turns the selection into one framed text document split into \
                  fixed-size batches.\n\n\
                  Request files use the JSON body \
                  {\"projectPath\", \"selectedTree\", \"linesPerBatch\"}."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence logs and progress messages
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a project and print its filtered tree as JSON
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Batch a selection and print the summary as JSON
    Batch {
        /// Request file, or `-` for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// Lines per batch (overrides the request)
        #[arg(short, long)]
        lines: Option<i64>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a selection as one combined text document
    Download {
        /// Request file, or `-` for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a selection's batches as a zip archive
    DownloadBatches {
        /// Request file, or `-` for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// Lines per batch (overrides the request)
        #[arg(short, long)]
        lines: Option<i64>,

        /// Archive path (defaults to code-batcher-batches.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan a project and zip the batches of every file
    Aggregate {
        #[command(flatten)]
        scan: ScanArgs,

        /// Lines per batch
        #[arg(short, long)]
        lines: Option<i64>,

        /// Archive path (defaults to code-batcher-aggregate.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Project root (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Include dotfiles and dot-directories
    #[arg(long)]
    hidden: bool,

    /// Do not read the root .gitignore
    #[arg(long)]
    no_gitignore: bool,

    /// Extra ignore pattern in gitignore syntax (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,
}

impl ScanArgs {
    fn to_config(&self) -> Result<ScanConfig, ScanError> {
        ScanConfig::builder()
            .root(self.path.clone())
            .include_hidden(self.hidden)
            .use_gitignore(!self.no_gitignore)
            .extra_ignore_patterns(self.ignore.clone())
            .follow_symlinks(self.follow_symlinks)
            .build()
            .map_err(|e| ScanError::InvalidConfig {
                message: e.to_string(),
            })
    }
}

/// Body printed by `scan`.
#[derive(Serialize)]
struct ScanResponse<'a> {
    tree: &'a [Node],
}

/// Failure envelope written to stderr.
#[derive(Serialize)]
struct FailureEnvelope {
    success: bool,
    category: Option<ErrorCategory>,
    error: String,
}

fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("Failed to install error handler: {err}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(cli.command, cli.quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            tracing::debug!("{report:?}");
            let category = error_category(&report);
            print_failure(&report, category);
            ExitCode::from(exit_code(category))
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command, quiet: bool) -> Result<()> {
    match command {
        Command::Scan { scan, output } => run_scan(&scan, output.as_deref()),
        Command::Batch {
            request,
            lines,
            output,
        } => run_batch(&request, lines, output.as_deref()),
        Command::Download { request, output } => run_download(&request, output.as_deref(), quiet),
        Command::DownloadBatches {
            request,
            lines,
            output,
        } => run_download_batches(&request, lines, output, quiet),
        Command::Aggregate {
            scan,
            lines,
            output,
        } => run_aggregate(&scan, lines, output, quiet),
    }
}

/// Scan a project and print `{"tree": [...]}`.
fn run_scan(args: &ScanArgs, output: Option<&Path>) -> Result<()> {
    let config = args.to_config()?;
    let tree = TreeScanner::new()
        .scan(&config)
        .wrap_err("Scan failed")?;

    tracing::info!(
        "Scanned {} in {:.2}s",
        tree.root_path.display(),
        tree.scan_duration.as_secs_f64()
    );

    let json = serde_json::to_string_pretty(&ScanResponse { tree: &tree.tree })?;
    emit(output, &json)
}

/// Batch a selection and print the summary.
fn run_batch(request: &Path, lines: Option<i64>, output: Option<&Path>) -> Result<()> {
    let mut body = read_request(request)?;
    if lines.is_some() {
        body.lines_per_batch = lines;
    }
    let request = body.validate()?;

    let outcome = BatchPipeline::for_request(&request).run(&request.selected_tree);
    let json = serde_json::to_string_pretty(&outcome.summary())?;
    emit(output, &json)
}

/// Write the combined document of a selection.
fn run_download(request: &Path, output: Option<&Path>, quiet: bool) -> Result<()> {
    let request = read_request(request)?.validate()?;
    let outcome = BatchPipeline::for_request(&request).run(&request.selected_tree);

    match output {
        Some(path) => {
            let written = write_text_file(path, outcome.content())?;
            if !quiet {
                eprintln!(
                    "Wrote {} files ({}) to {}",
                    outcome.total_files,
                    format_size(written),
                    path.display()
                );
            }
        }
        None => {
            write_text(io::stdout().lock(), outcome.content())?;
        }
    }

    Ok(())
}

/// Zip the batches of a selection.
fn run_download_batches(
    request: &Path,
    lines: Option<i64>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let mut body = read_request(request)?;
    if lines.is_some() {
        body.lines_per_batch = lines;
    }
    let request = body.validate()?;

    let outcome = BatchPipeline::for_request(&request).run(&request.selected_tree);
    let path = output.unwrap_or_else(|| PathBuf::from(ArchiveKind::Batches.default_file_name()));

    let report = write_archive_file(&path, ArchiveKind::Batches, outcome.batches())?;
    if !quiet {
        eprintln!(
            "Wrote {} batches from {} files ({} uncompressed) to {}",
            report.entries,
            outcome.total_files,
            format_size(report.uncompressed_bytes),
            report.path.display()
        );
    }

    Ok(())
}

/// Scan a project, select everything, and zip the batches.
fn run_aggregate(
    args: &ScanArgs,
    lines: Option<i64>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let (root, batch_config) = AggregateRequest {
        project_path: Some(args.path.to_string_lossy().into_owned()),
        lines_per_batch: lines,
    }
    .validate()?;

    let mut scan_config = args.to_config()?;
    scan_config.root = root;

    let tree = TreeScanner::new()
        .scan(&scan_config)
        .wrap_err("Scan failed")?;

    let outcome = BatchPipeline::new(&tree.root_path, &batch_config).run_all(&tree.tree);
    let path =
        output.unwrap_or_else(|| PathBuf::from(ArchiveKind::Aggregate.default_file_name()));

    let report = write_archive_file(&path, ArchiveKind::Aggregate, outcome.batches())?;
    if !quiet {
        eprintln!(
            "Wrote {} batches from {} files ({} uncompressed) to {}",
            report.entries,
            outcome.total_files,
            format_size(report.uncompressed_bytes),
            report.path.display()
        );
    }

    Ok(())
}

/// Read a request body from a file, or stdin for `-`.
fn read_request(source: &Path) -> Result<BatchRequest> {
    if source == Path::new("-") {
        return Ok(BatchRequest::from_reader(io::stdin().lock())?);
    }

    let file = File::open(source).map_err(|e| InputError::Malformed {
        message: format!("cannot open {}: {e}", source.display()),
    })?;
    Ok(BatchRequest::from_reader(BufReader::new(file))?)
}

/// Write `content` to `output`, or stdout.
fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            write_text_file(path, content)?;
        }
        None => {
            write_text(io::stdout().lock(), content)?;
            println!();
        }
    }
    Ok(())
}

/// Recover the category of the first typed error in the chain.
fn error_category(report: &Report) -> Option<ErrorCategory> {
    report.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<InputError>() {
            Some(err.category())
        } else if let Some(err) = cause.downcast_ref::<ScanError>() {
            Some(err.category())
        } else {
            cause
                .downcast_ref::<ArchiveError>()
                .map(ArchiveError::category)
        }
    })
}

fn exit_code(category: Option<ErrorCategory>) -> u8 {
    match category {
        Some(ErrorCategory::InputError) => 2,
        Some(ErrorCategory::ScanError) => 3,
        Some(ErrorCategory::ArchiveError) => 4,
        Some(ErrorCategory::FileReadError) | None => 1,
    }
}

fn print_failure(report: &Report, category: Option<ErrorCategory>) {
    let envelope = FailureEnvelope {
        success: false,
        category,
        error: report
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": "),
    };

    match serde_json::to_string(&envelope) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("Error: {report}"),
    }
}

/// Format bytes as human-readable size.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
