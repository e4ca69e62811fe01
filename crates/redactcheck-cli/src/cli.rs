use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Detect and repair improperly redacted PDF documents.
#[derive(Debug, Parser)]
#[command(name = "redactcheck", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Audit a PDF for improperly redacted content
    Audit {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the audit to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Strip overlay artifacts and annotations, writing a cleaned PDF
    Clean {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the cleaned PDF. Default: '<FILE>.cleaned.pdf'
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Audit JSON from a previous 'audit' run (advisory accounting only)
        #[arg(long, value_name = "PATH")]
        audit: Option<PathBuf>,

        /// Output format for the actions summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for command results.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}
