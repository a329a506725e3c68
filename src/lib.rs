//! pcapdns - Extract DNS questions and answers from packet captures.
//!
//! The decoding itself lives in [`pcapdns_core`]; this crate adds the
//! command-line front end and its output formats.
//!
//! # Example
//!
//! ```no_run
//! use pcapdns::cli::{OutputFormat, OutputFormatter};
//! use pcapdns_core::{DnsRecordReader, PcapReader};
//!
//! fn main() -> anyhow::Result<()> {
//!     let reader = DnsRecordReader::new(PcapReader::open("capture.pcap")?);
//!     let rows = reader.collect::<Result<Vec<_>, _>>()?;
//!
//!     let mut formatter = OutputFormatter::new(OutputFormat::Csv);
//!     formatter.write(&rows, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod cli;

pub use pcapdns_core::{Error, Result};
