//! # pcapdns-core
//!
//! DNS record extraction from packet captures.
//!
//! Frames are decoded link layer first down to a UDP payload, the payload is
//! parsed as a DNS message, and every question and answer entry becomes one
//! flat [`OutputRecord`] keyed by the capture second of its frame.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pcapdns_core::prelude::*;
//!
//! let capture = PcapReader::open("capture.pcap")?;
//! let reader = DnsRecordReader::new(capture);
//!
//! for row in reader {
//!     let (key, record) = row?;
//!     println!("{key} {} {} {:?}", record.mode, record.qname, record.answer_data);
//! }
//! # Ok::<(), pcapdns_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        pcapdns-core                                 |
//! +---------------------------------------------------------------------+
//! |  io/        - PacketReader, RawPacket, PCAP/PCAPNG stream, gzip     |
//! |  pcap/      - PcapReader for capture files on disk                  |
//! |  protocol/  - Protocol trait, link/network/UDP decoders, registry   |
//! |  dns/       - DNS message parser (names, compression, RDATA)        |
//! |  record     - OutputRecord and the message flattener                |
//! |  reader     - DnsRecordReader pull iterator                         |
//! |  schema/    - FieldDescriptor, DataKind, FieldValue                 |
//! |  error      - Error types                                           |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Supported Encapsulations
//!
//! | Layer | Protocols |
//! |-------|-----------|
//! | Link | Ethernet, VLAN (802.1Q, QinQ), Linux cooked capture, raw IP |
//! | Network | IPv4, IPv6 |
//! | Transport | UDP |
//! | Application | DNS |

pub mod dns;
pub mod error;
pub mod io;
pub mod pcap;
pub mod prelude;
pub mod protocol;
pub mod reader;
pub mod record;
pub mod schema;

pub use dns::{DnsHeader, DnsMessage, RecordData, ResourceRecord};
pub use error::{DecodeError, DnsError, Error, PcapError, Result};
pub use io::{PacketReader, RawPacket};
pub use pcap::PcapReader;
pub use protocol::{decode_frame, default_registry, DecodedFrame, FlowEndpoints, ProtocolRegistry};
pub use reader::{DnsRecordReader, ReaderConfig, ReaderState, ReaderStats};
pub use record::{flatten, flatten_into, KeyedRecord, Mode, OutputRecord};
pub use schema::{DataKind, FieldDescriptor, FieldValue};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
