//! undocx CLI - Word document structure extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use undocx::batch::format_elapsed;
use undocx::config::DEFAULT_OUTPUT_FILE;
use undocx::parser::{DEFAULT_HEADING_MIN_FONT_SIZE, DEFAULT_PREVIEW_LENGTH};
use undocx::report::{batch_to_json, to_json};
use undocx::writer::DEFAULT_HEADER_BG_COLOR;
use undocx::{
    process_file_with_options, BatchEvent, BatchProcessor, BatchReport, Config, Document,
    EmptyDocumentPolicy, Error, JsonFormat, ProcessOptions,
};

#[derive(Parser)]
#[command(name = "undocx")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract Word document structure into an Excel workbook", long_about = None)]
struct Cli {
    /// Directory containing .docx files
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    #[command(flatten)]
    batch: BatchArgs,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every .docx under a directory into one workbook
    Batch {
        /// Directory containing .docx files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        #[command(flatten)]
        args: BatchArgs,
    },

    /// Show the extracted structure of a single document
    Inspect {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Compact JSON output
        #[arg(long, requires = "json")]
        compact: bool,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Debug)]
struct BatchArgs {
    /// Output workbook
    #[arg(short, long, value_name = "FILE", env = "UNDOCX_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    #[command(flatten)]
    process: ProcessArgs,

    /// Header fill colour (RGB hex, e.g. 366092)
    #[arg(long, value_name = "HEX", env = "UNDOCX_HEADER_COLOR", default_value = DEFAULT_HEADER_BG_COLOR)]
    header_color: String,

    /// Also write the run report as JSON
    #[arg(long, value_name = "FILE")]
    json_report: Option<PathBuf>,
}

/// Extraction settings shared by `batch` and `inspect`.
#[derive(Args, Clone, Debug)]
struct ProcessArgs {
    /// Maximum characters kept in each section preview
    #[arg(long, value_name = "CHARS", env = "UNDOCX_PREVIEW_LENGTH", default_value_t = DEFAULT_PREVIEW_LENGTH)]
    preview_length: usize,

    /// Minimum font size (pt) for bold paragraphs to count as headings
    #[arg(long, value_name = "PT", env = "UNDOCX_HEADING_SIZE", default_value_t = DEFAULT_HEADING_MIN_FONT_SIZE)]
    heading_size: f32,

    /// Handling of documents without any paragraphs
    #[arg(long, value_enum, env = "UNDOCX_EMPTY_DOCUMENTS", default_value = "accept")]
    empty_documents: EmptyDocuments,
}

impl ProcessArgs {
    fn options(&self) -> ProcessOptions {
        ProcessOptions::new()
            .with_preview_length(self.preview_length)
            .with_heading_min_font_size(self.heading_size)
            .with_empty_document_policy(self.empty_documents.into())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EmptyDocuments {
    /// Keep them with zero counts
    Accept,
    /// Keep them and log a warning
    Warn,
    /// Count them as failures
    Reject,
}

impl From<EmptyDocuments> for EmptyDocumentPolicy {
    fn from(value: EmptyDocuments) -> Self {
        match value {
            EmptyDocuments::Accept => EmptyDocumentPolicy::Accept,
            EmptyDocuments::Warn => EmptyDocumentPolicy::Warn,
            EmptyDocuments::Reject => EmptyDocumentPolicy::Reject,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let level = log_level(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(Commands::Batch { input, args }) => start_batch(&input, &args, level),
        Some(Commands::Inspect {
            input,
            json,
            compact,
            process,
        }) => {
            init_logging(level);
            cmd_inspect(&input, json, compact, &process)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch if an input directory is provided
            if let Some(input) = cli.input {
                start_batch(&input, &cli.batch, level)
            } else {
                println!("{}", "Usage: undocx <INPUT_DIR> [-o OUTPUT]".yellow());
                println!("       undocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Progress bar output is the default, so only warnings are logged unless
/// asked for.
fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_config(input: &Path, args: &BatchArgs, level: LevelFilter) -> Config {
    Config::new(input)
        .with_output(args.output.clone())
        .with_preview_length(args.process.preview_length)
        .with_heading_min_font_size(args.process.heading_size)
        .with_header_color(args.header_color.clone())
        .with_empty_document_policy(args.process.empty_documents.into())
        .with_log_level(level)
}

fn start_batch(
    input: &Path,
    args: &BatchArgs,
    level: LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(input, args, level);
    init_logging(config.log_level);
    cmd_batch(config, args)
}

fn cmd_batch(config: Config, args: &BatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let processor = BatchProcessor::new(config)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("Scanning...");

    let result = processor.run_with(|event| match event {
        BatchEvent::Discovered { total } => pb.set_length(total as u64),
        BatchEvent::Started { path, .. } => pb.set_message(file_label(path)),
        BatchEvent::Processed { .. } => pb.inc(1),
        BatchEvent::Failed { path, error, .. } => {
            pb.println(format!("{} {}: {}", "Failed".red(), path.display(), error));
            pb.inc(1);
        }
        BatchEvent::Writing { .. } => pb.set_message("Writing workbook..."),
    });

    let report = match result {
        Ok(report) => report,
        Err(Error::BatchWrite { report, source }) => {
            pb.abandon();
            print_summary(&report);
            save_json_report(&report, args)?;
            return Err((*source).into());
        }
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };
    pb.finish_with_message("Done!");

    print_summary(&report);
    save_json_report(&report, args)?;

    if !report.is_success() {
        return Err(format!(
            "{} of {} documents failed",
            report.failed(),
            report.failed() + report.succeeded()
        )
        .into());
    }

    Ok(())
}

fn save_json_report(
    report: &BatchReport,
    args: &BatchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.json_report {
        let json = batch_to_json(report, JsonFormat::Pretty)?;
        fs::write(path, json)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(report: &BatchReport) {
    let totals = report.totals();
    let failed = report.failed().to_string();

    println!();
    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {}",
        "Processed".bold(),
        report.succeeded().to_string().green()
    );
    println!(
        "{}: {}",
        "Failed".bold(),
        if report.is_success() {
            failed.normal()
        } else {
            failed.red()
        }
    );
    println!("{}: {}", "Words".bold(), totals.words);
    println!("{}: {}", "Images".bold(), totals.images);
    println!("{}: {}", "Sections".bold(), totals.sections);
    println!("{}: {}", "Elapsed".bold(), format_elapsed(report.elapsed));
    println!("{}: {}", "Output".bold(), report.output.display());

    if let Some(last) = report.failures.len().checked_sub(1) {
        println!();
        println!("{}", "Failed documents:".red().bold());
        for (i, failure) in report.failures.iter().enumerate() {
            let branch = if i == last { "└─" } else { "├─" };
            println!(
                "  {} {}: {}",
                branch.dimmed(),
                failure.path.display(),
                failure.reason
            );
        }
    }
}

fn cmd_inspect(
    input: &Path,
    json: bool,
    compact: bool,
    process: &ProcessArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = process_file_with_options(input, process.options())?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", to_json(&doc, format)?);
        return Ok(());
    }

    print_document(input, &doc);
    Ok(())
}

fn print_document(input: &Path, doc: &Document) {
    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), doc.title);
    if let Some(author) = doc.author() {
        println!("{}: {}", "Author".bold(), author);
    }
    println!("{}: {}", "Script".bold(), doc.script);
    println!("{}: {}", "Words".bold(), doc.word_count);
    println!(
        "{}: {} ({} unique)",
        "Images".bold(),
        doc.image_count,
        doc.unique_image_count
    );
    println!("{}: {}", "Captions".bold(), doc.caption_count);
    println!(
        "{}: {}",
        "Heading Styles".bold(),
        if doc.uses_heading_styles() { "Yes" } else { "No" }
    );

    println!();
    println!(
        "{} ({})",
        "Sections".cyan().bold(),
        doc.section_count()
    );
    println!("{}", "─".repeat(40).dimmed());

    for section in &doc.sections {
        let size = section
            .font_size
            .map(|s| format!("{}pt", s))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{} {} {}",
            section.heading_text.bold(),
            format!("[{}]", section.detected_by.label()).dimmed(),
            format!("{} {}, {} words", section.font_name_label(), size, section.body_word_count)
                .dimmed()
        );
    }
}

fn cmd_version() {
    println!("{} {}", "undocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document structure extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/undocx".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_default_batch_args() {
        let cli = Cli::try_parse_from(["undocx", "docs"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("docs")));
        assert_eq!(cli.batch.process.preview_length, 200);
        assert_eq!(cli.batch.process.heading_size, 14.0);
        assert_eq!(cli.batch.process.empty_documents, EmptyDocuments::Accept);
    }

    #[test]
    fn test_batch_subcommand() {
        let cli = Cli::try_parse_from([
            "undocx",
            "batch",
            "docs",
            "-o",
            "out.xlsx",
            "--empty-documents",
            "reject",
            "-vv",
        ])
        .unwrap();

        assert_eq!(log_level(cli.verbose, cli.quiet), LevelFilter::Debug);
        match cli.command {
            Some(Commands::Batch { input, args }) => {
                let level = log_level(cli.verbose, cli.quiet);
                let config = build_config(&input, &args, level);
                assert_eq!(config.output_file, PathBuf::from("out.xlsx"));
                assert_eq!(config.empty_document_policy, EmptyDocumentPolicy::Reject);
                assert_eq!(config.log_level, LevelFilter::Debug);
            }
            _ => panic!("expected batch command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["undocx", "-q", "-v", "docs"]).is_err());
        assert_eq!(log_level(0, true), LevelFilter::Error);
    }

    #[test]
    fn test_invalid_directory_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let args = Cli::try_parse_from(["undocx", "x"]).unwrap().batch;
        let missing = dir.path().join("missing");
        assert!(cmd_batch(build_config(&missing, &args, LevelFilter::Off), &args).is_err());
    }

    #[test]
    fn test_inspect_shares_processing_flags() {
        let cli = Cli::try_parse_from([
            "undocx",
            "inspect",
            "report.docx",
            "--preview-length",
            "50",
            "--heading-size",
            "16",
            "--empty-documents",
            "reject",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Inspect { process, .. }) => {
                let options = process.options();
                assert_eq!(options.max_preview_length, 50);
                assert_eq!(options.heading_min_font_size, 16.0);
                assert_eq!(options.empty_document, EmptyDocumentPolicy::Reject);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_batch_and_inspect_process_alike() {
        let batch = Cli::try_parse_from(["undocx", "docs", "--preview-length", "80"]).unwrap();
        let config = build_config(Path::new("docs"), &batch.batch, LevelFilter::Warn);
        let options = batch.batch.process.options();

        let from_config = config.process_options();
        assert_eq!(from_config.max_preview_length, options.max_preview_length);
        assert_eq!(from_config.heading_min_font_size, options.heading_min_font_size);
        assert_eq!(from_config.empty_document, options.empty_document);
    }

    #[test]
    fn test_write_failure_still_saves_report() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let json_path = out.path().join("run.json");
        let output = out.path().join("missing").join("analysis.xlsx");

        let args: Vec<OsString> = vec![
            "undocx".into(),
            input.path().into(),
            "-o".into(),
            output.clone().into(),
            "--json-report".into(),
            json_path.clone().into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let config = build_config(input.path(), &cli.batch, LevelFilter::Off);
        assert!(cmd_batch(config, &cli.batch).is_err());
        assert!(json_path.exists());
        assert!(!output.exists());
    }
}
