//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

use pcapdns_core::ReaderConfig;

use super::OutputFormat;

/// Extract DNS questions and answers from packet captures.
#[derive(Parser, Debug)]
#[command(name = "pcapdns")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture file to read (pcap or pcapng, optionally gzip-compressed)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format (default: inferred from --output, else table)
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Write rows to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Only read datagrams to or from this UDP port (repeatable)
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub ports: Vec<u16>,

    /// Stop after this many rows
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// List registered protocol decoders
    #[arg(long = "list-protocols")]
    pub list_protocols: bool,

    /// Show the output schema
    #[arg(long = "schema")]
    pub show_schema: bool,

    /// Print reader statistics to stderr when done
    #[arg(long = "stats")]
    pub stats: bool,

    /// Rows buffered per write
    #[arg(long = "batch-size", default_value = "1000")]
    pub batch_size: usize,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Check if this is an info-only command (no capture file needed).
    pub fn is_info_only(&self) -> bool {
        self.list_protocols || self.show_schema
    }

    /// Format to write rows in.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_extension))
            .unwrap_or(OutputFormat::Table)
    }

    pub fn reader_config(&self) -> ReaderConfig {
        if self.ports.is_empty() {
            ReaderConfig::default()
        } else {
            ReaderConfig::new().with_ports(self.ports.iter().copied())
        }
    }
}
