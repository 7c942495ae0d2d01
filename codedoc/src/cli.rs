///
/// This module implements the CLI interface for codedoc: command parsing,
/// argument validation and user-visible output.
///
/// All rendering, highlighting and clipboard logic lives in the [`codedoc-core`] crate.
/// This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: use the installed `codedoc` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`codedoc-core`]: ../../codedoc-core/
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codedoc_core::build::{build_site, FsPageWriter};
use codedoc_core::clipboard::{Clipboard, SystemClipboard};
use codedoc_core::highlight::annotate;
use std::path::{Path, PathBuf};

/// CLI for codedoc: render documentation sites with highlighted code samples.
#[derive(Parser)]
#[clap(
    name = "codedoc",
    version,
    about = "Render static documentation sites with syntax-highlighted code samples"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every page described by the given site file
    Build {
        /// Path to the YAML site file
        #[clap(long)]
        config: PathBuf,
    },
    /// Print the highlighted form of a source file
    Highlight {
        /// Source file to highlight
        file: PathBuf,
        #[clap(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },
    /// Copy a source file, verbatim, to the system clipboard
    Copy {
        /// Source file to copy
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Escaped HTML with `syntax-*` classed spans
    Html,
    /// Every span as a JSON array
    Json,
    /// One line per categorized span: `start..end<TAB>category<TAB>text`
    Spans,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Build { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "build", "Starting site build");
            let writer = FsPageWriter::new(&config.output_dir);
            match build_site(&config, &writer).await {
                Ok(report) => {
                    tracing::info!(command = "build", ?report, "Build complete");
                    println!(
                        "Build complete: {} page(s) written to {}",
                        report.pages.len(),
                        config.output_dir.display()
                    );
                    for page in &report.pages {
                        println!(
                            "  {} ({} bytes, {} code block(s))",
                            page.file_name, page.bytes, page.code_blocks
                        );
                    }
                    if !report.removed.is_empty() {
                        println!("Removed {} stale page(s)", report.removed.len());
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "build", error = %e, "Build failed");
                    Err(anyhow::Error::new(e).context("Site build failed"))
                }
            }
        }
        Commands::Highlight { file, format } => {
            let source = read_source(&file)?;
            let annotated = annotate(&source);
            tracing::info!(
                command = "highlight",
                spans = annotated.len(),
                ?format,
                "Highlighted source file"
            );
            match format {
                OutputFormat::Html => println!("{}", annotated.to_html()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&annotated)?),
                OutputFormat::Spans => {
                    for span in annotated.tokens() {
                        if let Some(category) = span.category {
                            println!("{}..{}\t{}\t{:?}", span.start, span.end, category, span.text);
                        }
                    }
                }
            }
            Ok(())
        }
        Commands::Copy { file } => {
            let source = read_source(&file)?;
            let clipboard = SystemClipboard::detect().context("Clipboard is not available")?;
            match clipboard.write_text(&source).await {
                Ok(()) => {
                    tracing::info!(command = "copy", bytes = source.len(), "Copied file to clipboard");
                    println!("Copied {} bytes from {}", source.len(), file.display());
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "copy", error = %e, "Copy failed");
                    Err(anyhow::Error::new(e).context("Copy to clipboard failed"))
                }
            }
        }
    }
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read source file {:?}", file))
}
