//! pcapdns CLI entry point.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pcapdns::cli::{Args, OutputFormatter};
use pcapdns_core::protocol::{default_registry, Protocol};
use pcapdns_core::{DnsRecordReader, FieldDescriptor, OutputRecord, PcapReader};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    // Handle info-only commands
    if args.is_info_only() {
        if args.list_protocols {
            list_protocols();
        }
        if args.show_schema {
            show_schema();
        }
        return Ok(());
    }

    let pcap_file = args
        .file
        .as_deref()
        .context("Capture file required. Use --help for usage.")?;

    let capture = PcapReader::open(pcap_file)
        .with_context(|| format!("Failed to open capture file: {}", pcap_file.display()))?;
    let mut reader = DnsRecordReader::with_config(capture, args.reader_config());

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut formatter = OutputFormatter::new(args.output_format());

    let batch_size = args.batch_size.max(1);
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut batch = Vec::with_capacity(batch_size.min(limit));
    let mut emitted = 0usize;

    while emitted < limit {
        let Some(row) = reader
            .next_record()
            .with_context(|| format!("Failed reading {}", pcap_file.display()))?
        else {
            break;
        };
        batch.push(row);
        emitted += 1;

        if batch.len() >= batch_size {
            formatter.write(&batch, &mut writer)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        formatter.write(&batch, &mut writer)?;
    }
    writer.flush()?;
    reader.close();

    info!(rows = emitted, "done");
    if let Some(path) = &args.output {
        eprintln!("Wrote {} rows to {}", emitted, path.display());
    }
    if args.stats {
        eprintln!("{}", reader.stats());
    }

    Ok(())
}

fn list_protocols() {
    let registry = default_registry();

    println!("Registered Protocol Decoders:");
    println!("{:-<50}", "");

    for parser in registry.all_parsers() {
        println!("  {} ({})", parser.display_name(), parser.name());

        let children = parser.child_protocols();
        if !children.is_empty() {
            println!("    -> Can identify: {}", children.join(", "));
        }
    }
    println!("  DNS (dns) over any UDP payload");
}

fn show_schema() {
    println!("Rows: dns");
    println!("{:-<72}", "");
    println!("{:<16} {:<10} {:<9} Description", "Column", "Type", "Nullable");
    println!("{:-<72}", "");

    for field in std::iter::once(FieldDescriptor::key()).chain(OutputRecord::schema()) {
        let nullable = if field.nullable { "YES" } else { "NO" };
        println!(
            "{:<16} {:<10} {:<9} {}",
            field.name,
            field.kind.type_name(),
            nullable,
            field.description.unwrap_or("")
        );
    }
}
