//! Convenient re-exports for common usage.
//!
//! ```rust,no_run
//! use pcapdns_core::prelude::*;
//!
//! let reader = DnsRecordReader::with_config(
//!     PcapReader::open("capture.pcap.gz")?,
//!     ReaderConfig::new().with_ports([53]),
//! );
//! # Ok::<(), Error>(())
//! ```

// Schema types
pub use crate::schema::{DataKind, FieldDescriptor, FieldValue};

// Decoding
pub use crate::dns::{DnsMessage, RecordData};
pub use crate::protocol::{decode_frame, default_registry, FlowEndpoints, Protocol, ProtocolRegistry};

// I/O types
pub use crate::io::{PacketReader, RawPacket};
pub use crate::pcap::PcapReader;

// Records
pub use crate::reader::{DnsRecordReader, ReaderConfig, ReaderStats};
pub use crate::record::{KeyedRecord, Mode, OutputRecord};

// Error types
pub use crate::error::{Error, Result};
