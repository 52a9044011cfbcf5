use anyhow::{Context, Result};
use chaptersplit::config::{Config, LogLevel};
use chaptersplit::{
    detect, export_by_count, export_by_size, export_individual, export_merged, Chapter,
    ExportConfig, ExportError, ExportUnit, OutputFormat, Selection, SourceDocument, UnitWriter,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "chaptersplit")]
#[command(about = "Split long documents into chapters and export them as files")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "chaptersplit.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chapters detected in a document
    Detect {
        /// Document to scan
        file: PathBuf,

        /// Print chapters as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export selected chapters to files
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Document to split
    file: PathBuf,

    /// Export strategy
    #[arg(short, long, value_enum, default_value = "individual")]
    mode: Mode,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Chapters to export: "all", or numbers and ranges like "1-3,7"
    #[arg(short, long, default_value = "all")]
    select: String,

    /// Export every chapter not matched by --select
    #[arg(long)]
    invert: bool,

    /// Output format (txt, md)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Do not prefix file names with the source file name
    #[arg(long)]
    no_source_prefix: bool,

    /// Prefix file names with the 4-digit chapter number
    #[arg(long)]
    index_prefix: bool,

    /// Size limit per part in MB (size mode)
    #[arg(long)]
    size_mb: Option<String>,

    /// Chapters per file (count mode)
    #[arg(long)]
    batch: Option<String>,

    /// Fail instead of overwriting existing files
    #[arg(long)]
    no_clobber: bool,

    /// Write manifest.json next to the exported files
    #[arg(long)]
    manifest: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// One file per chapter
    Individual,
    /// All selected chapters in one file
    Merged,
    /// Parts bounded by size
    Size,
    /// Batches of N chapters
    Count,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    // Setup logging
    let log_level = match cli.verbose {
        0 => level_from_config(config.logging.level),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Detect { file, json } => run_detect(file, json),
        Commands::Export(args) => run_export(args, &config),
    }
}

fn level_from_config(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

fn run_detect(file: PathBuf, json: bool) -> Result<()> {
    let source = SourceDocument::load(&file)?;
    let chapters = detect(&source.text);

    if json {
        println!("{}", serde_json::to_string_pretty(&chapters)?);
        return Ok(());
    }

    if chapters.is_empty() {
        info!("No chapters detected; check the document format");
        return Ok(());
    }

    for (i, chapter) in chapters.iter().enumerate() {
        println!(
            "{:>5}  {:<10} {:>9}  {}",
            i + 1,
            chapter.kind,
            chapter.byte_len(),
            chapter.title
        );
    }
    println!("\n{} chapters in {}", chapters.len(), file.display());

    Ok(())
}

fn run_export(args: ExportArgs, config: &Config) -> Result<()> {
    let source = SourceDocument::load(&args.file)?;
    let chapters = detect(&source.text);
    if chapters.is_empty() {
        info!("No chapters detected; nothing to export");
        return Ok(());
    }

    let export_config = build_export_config(&args, config, source.stem.as_deref())?;

    let mut selection = Selection::parse(&args.select, chapters.len())
        .context(format!("Invalid chapter selection: {}", args.select))?;
    if args.invert {
        selection = selection.invert();
    }

    let units = match export_units(&source.text, &chapters, &selection, args.mode, &export_config)
    {
        Ok(units) => units,
        Err(e) if e.is_soft() => {
            info!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut writer = UnitWriter::new(&args.output)
        .overwrite(!args.no_clobber)
        .manifest(args.manifest);
    if let Some(name) = args.file.file_name().and_then(|n| n.to_str()) {
        writer = writer.source(name);
    }
    let report = writer.write(&units)?;

    println!(
        "Exported {} file(s) to {}",
        report.written.len(),
        writer.dir().display()
    );
    Ok(())
}

fn build_export_config(
    args: &ExportArgs,
    config: &Config,
    stem: Option<&str>,
) -> Result<ExportConfig> {
    let mut export_config = config.export.to_export_config(stem)?;

    if let Some(format) = args.format {
        export_config.format = format;
    }
    if args.no_source_prefix {
        export_config.use_source_prefix = false;
    }
    if args.index_prefix {
        export_config.use_index_prefix = true;
    }
    if let Some(size) = &args.size_mb {
        export_config.size_limit_bytes = chaptersplit::export::parse_size_limit_mb(size)?;
    }
    if let Some(batch) = &args.batch {
        export_config.batch_count = chaptersplit::export::parse_batch_count(batch)?;
    }

    Ok(export_config)
}

fn export_units(
    document: &str,
    chapters: &[Chapter],
    selection: &Selection,
    mode: Mode,
    config: &ExportConfig,
) -> Result<Vec<ExportUnit>, ExportError> {
    let selected = selection.indices();
    match mode {
        Mode::Individual => export_individual(document, chapters, selected, config),
        Mode::Merged => export_merged(document, chapters, selected, config).map(|unit| vec![unit]),
        Mode::Size => export_by_size(document, chapters, selected, config),
        Mode::Count => export_by_count(document, chapters, selected, config),
    }
}
