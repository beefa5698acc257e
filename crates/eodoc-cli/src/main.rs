//! eodoc - documentation generator for EO intermediate representation
//!
//! ## Commands
//!
//! - `generate`: render HTML pages and `summary.xml` from an XMIR tree
//! - `extract`: show the facts extracted from a single artifact

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eodoc_core::{extract_file, DocEngine, DocsConfig, Extraction, RunReport};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "eodoc")]
#[command(author = "Stevedores Org")]
#[command(version = eodoc_core::VERSION)]
#[command(about = "Documentation generator for EO XMIR artifacts", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines and JSON command output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate per-artifact, per-package and global pages plus summary.xml
    ///
    /// Unset flags fall back to EODOC_INPUT, EODOC_OUTPUT, EODOC_EXTENSION
    /// and EODOC_TRANSFORM, then to the built-in defaults.
    Generate {
        /// Directory holding XMIR artifacts [default: target/eo]
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory for the documentation tree [default: docs]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Artifact file extension, without the dot [default: xmir]
        #[arg(short, long)]
        extension: Option<String>,

        /// HTML template used to render each artifact (built-in if omitted)
        #[arg(short, long)]
        transform: Option<PathBuf>,
    },

    /// Extract metadata, declared objects and sheets from one artifact
    Extract {
        /// Path to an XMIR file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    eodoc_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Generate {
            input,
            output,
            extension,
            transform,
        } => {
            let config = apply_flags(DocsConfig::from_env(), input, output, extension, transform);
            cmd_generate(config, cli.json)
        }
        Commands::Extract { file } => cmd_extract(&file, cli.json),
    }
}

/// Layer explicitly given flags over an environment-derived config
fn apply_flags(
    mut config: DocsConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    extension: Option<String>,
    transform: Option<PathBuf>,
) -> DocsConfig {
    if let Some(input) = input {
        config.input_dir = input;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(extension) = extension {
        config = config.with_extension(extension);
    }
    if let Some(path) = transform {
        config = config.with_transform(path);
    }
    config
}

/// Run the documentation engine and report where the outputs went
fn cmd_generate(config: DocsConfig, json: bool) -> Result<()> {
    info!(
        "Generating documentation from {:?} into {:?}",
        config.input_dir, config.output_dir
    );
    let engine = DocEngine::from_config(config).context("Failed to prepare documentation run")?;
    let report = engine.run().context("Documentation run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report_text(&report));
    }
    Ok(())
}

/// Print the facts extracted from a single artifact
fn cmd_extract(file: &Path, json: bool) -> Result<()> {
    let extraction =
        extract_file(file).with_context(|| format!("Failed to extract facts from {:?}", file))?;

    for issue in &extraction.issues {
        eprintln!("warning: {}", issue);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&extraction.facts)?);
    } else {
        print!("{}", render_extraction_text(&extraction));
    }
    Ok(())
}

fn render_report_text(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Documented {} artifact(s) in {} package(s)\n",
        report.artifacts, report.packages
    ));
    out.push_str(&format!("  Output:  {}\n", report.output_dir.display()));
    out.push_str(&format!("  Summary: {}\n", report.summary.display()));
    if report.extract_issues > 0 {
        out.push_str(&format!(
            "  {} extraction warning(s); see log output\n",
            report.extract_issues
        ));
    }
    out
}

fn render_extraction_text(extraction: &Extraction) -> String {
    let facts = &extraction.facts;
    let mut out = String::new();

    out.push_str("Metadata:\n");
    let metadata = facts.metadata.entries();
    if metadata.is_empty() {
        out.push_str("  (none)\n");
    }
    for (key, value) in metadata {
        out.push_str(&format!("  {:<9} {}\n", key, value));
    }

    out.push_str(&format!("Objects ({}):\n", facts.entities.len()));
    for entity in &facts.entities {
        let name = entity.name.as_deref().unwrap_or("<anonymous>");
        let mut line = format!("  {}", name);
        if let Some(base) = &entity.base {
            line.push_str(&format!(" <- {}", base));
        }
        if let (Some(l), Some(p)) = (entity.line, entity.pos) {
            line.push_str(&format!(" @{}:{}", l, p));
        } else if let Some(l) = entity.line {
            line.push_str(&format!(" @{}", l));
        }
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&format!("Sheets ({}):\n", facts.sheets.len()));
    for (i, sheet) in facts.sheets.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, sheet));
    }
    out
}
