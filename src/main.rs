use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use claim_parse::{ExportFormat, SectionLevel, Severity};

mod metadata;

#[derive(Parser)]
#[command(
    name = "claimsight",
    version,
    about = "Export ClaimSight inspection narratives to print-ready artifacts"
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Pdf,
    Docx,
    Html,
    All,
}

impl FormatArg {
    fn targets(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Pdf => vec![ExportFormat::Pdf],
            FormatArg::Docx => vec![ExportFormat::Docx],
            FormatArg::Html => vec![ExportFormat::Html],
            FormatArg::All => vec![ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Html],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one narrative file into artifacts
    Export {
        /// Path to the narrative text file
        file: String,

        /// Metadata sidecar (.yaml/.json); defaults to a sibling of the input
        #[arg(long)]
        metadata: Option<String>,

        /// Artifact format(s) to produce
        #[arg(long, value_enum, default_value = "all")]
        format: FormatArg,

        /// Output directory (default: alongside the input)
        #[arg(long)]
        out: Option<String>,
    },

    /// Convert every .txt narrative under a directory
    Batch {
        /// Directory to scan recursively
        dir: String,

        #[arg(long, value_enum, default_value = "all")]
        format: FormatArg,

        /// Output directory (default: alongside each input)
        #[arg(long)]
        out: Option<String>,
    },

    /// Print the assembled section outline and any diagnostics
    Outline {
        /// Path to the narrative text file
        file: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export { file, metadata, format, out } => handle_export(
            Path::new(&file),
            metadata.as_deref().map(Path::new),
            format,
            out.as_deref().map(Path::new),
            cli.quiet,
        ),
        Commands::Batch { dir, format, out } => {
            handle_batch(Path::new(&dir), format, out.as_deref().map(Path::new), cli.quiet)
        }
        Commands::Outline { file } => handle_outline(&file),
    }
}

fn handle_export(
    file: &Path,
    metadata_path: Option<&Path>,
    format: FormatArg,
    out: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file.display(), e))?;
    let meta = metadata::load_for(file, metadata_path)?;

    let out_dir: PathBuf = match out {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.to_path_buf()
        }
        None => file.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };

    for target in format.targets() {
        let artifact = claim_parse::export(&meta, &raw, target)?;
        let path = out_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)?;
        if !quiet {
            println!("{} {}", "wrote".green(), path.display());
        }
    }
    Ok(())
}

fn handle_batch(dir: &Path, format: FormatArg, out: Option<&Path>, quiet: bool) -> Result<()> {
    let mut converted = 0usize;
    let mut failed = 0usize;

    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt")
        {
            continue;
        }
        match handle_export(path, None, format, out, quiet) {
            Ok(()) => converted += 1,
            Err(e) => {
                failed += 1;
                eprintln!("{}: {}: {}", "error".red().bold(), path.display(), e);
            }
        }
    }

    if !quiet {
        println!("{converted} narrative(s) converted, {failed} failed");
    }
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_outline(file: &str) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let result = claim_parse::parse(&raw);

    for diag in &result.diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => format!("{}", "error".red().bold()),
            Severity::Warning => format!("{}", "warning".yellow().bold()),
            Severity::Info => format!("{}", "info".cyan().bold()),
        };
        let line_info = match diag.line {
            Some(line) => format!("{file}:{line}"),
            None => file.to_string(),
        };
        let code_str = match &diag.code {
            Some(c) => format!("[{}] ", c),
            None => String::new(),
        };
        eprintln!("{line_info}: {severity_str}: {code_str}{}", diag.message);
    }

    for section in &result.doc.sections {
        let count = section.items.len();
        match section.level {
            SectionLevel::Major => {
                let header = if section.header_text.is_empty() {
                    "(untitled)".to_string()
                } else {
                    section.header_text.clone()
                };
                println!("{} ({count} items)", header.bold());
            }
            SectionLevel::Subsection => {
                println!("  {} ({count} items)", section.header_text);
            }
        }
    }
    Ok(())
}
