//! Packet I/O.
//!
//! Capture sources implement [`PacketReader`], a pull interface that hands
//! out one [`RawPacket`] per call and reports end of input as `Ok(None)`.
//!
//! - [`GenericPcapReader`] reads classic PCAP and PCAPNG from any `Read`
//! - [`DecompressReader`] transparently inflates gzip-compressed captures
//! - [`crate::pcap::PcapReader`] ties both together for files on disk

mod decompress;
mod pcap_stream;
mod source;

pub use decompress::{Compression, DecompressReader, FileDecoder};
pub use pcap_stream::{GenericPcapReader, PcapFormat};
pub use source::{PacketReader, RawPacket};
