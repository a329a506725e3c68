//! Error types for pcapdns-core.
//!
//! - [`enum@Error`] wraps everything a caller can see
//! - [`PcapError`] covers capture file problems
//! - [`DecodeError`] explains why a frame carries no usable UDP payload
//! - [`DnsError`] explains why a UDP payload is not a DNS message
//!
//! Only [`PcapError`] and I/O failures ever reach the consumer of a
//! [`crate::DnsRecordReader`]. Per-frame decode and DNS errors are counted
//! and the frame is skipped.

use thiserror::Error;

/// Main error type for pcapdns-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing the capture file
    #[error("PCAP error: {0}")]
    Pcap(#[from] PcapError),

    /// Frame could not be decoded down to a UDP payload
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// UDP payload is not a well-formed DNS message
    #[error("DNS error: {0}")]
    Dns(#[from] DnsError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to capture file reading.
#[derive(Error, Debug)]
pub enum PcapError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid capture format: {reason}")]
    InvalidFormat { reason: String },
}

/// Reasons a frame does not yield a UDP payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported link type {link_type}")]
    UnsupportedLinkType { link_type: u16 },

    #[error("unsupported network protocol (ethertype {ethertype:#06x})")]
    UnsupportedNetworkType { ethertype: u16 },

    #[error("unsupported transport protocol {ip_protocol}")]
    UnsupportedTransport { ip_protocol: u8 },

    #[error("{protocol}: truncated: {reason}")]
    Truncated {
        protocol: &'static str,
        reason: String,
    },

    #[error("{protocol}: datagram is a fragment")]
    Fragmented { protocol: &'static str },

    #[error("UDP {src_port} -> {dst_port} is outside the selected ports")]
    PortFiltered { src_port: u16, dst_port: u16 },

    #[error("more than {limit} encapsulation layers")]
    TooManyLayers { limit: usize },

    #[error("transport header without a network layer")]
    MissingNetworkLayer,
}

impl DecodeError {
    pub(crate) fn truncated(protocol: &'static str, reason: impl std::fmt::Display) -> Self {
        DecodeError::Truncated {
            protocol,
            reason: reason.to_string(),
        }
    }
}

/// Reasons a UDP payload is rejected as a DNS message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("header needs 12 bytes, have {len}")]
    TruncatedHeader { len: usize },

    #[error("{section} count {count} cannot fit in {remaining} remaining bytes")]
    CountExceedsData {
        section: &'static str,
        count: u16,
        remaining: usize,
    },

    #[error("message ends unexpectedly at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("reserved label type {byte:#04x} at offset {offset}")]
    BadLabelType { offset: usize, byte: u8 },

    #[error("name at offset {offset} exceeds 255 octets")]
    NameTooLong { offset: usize },

    #[error("compression pointer at offset {offset} targets {target}, which is not an earlier name")]
    BadPointer { offset: usize, target: usize },

    #[error("malformed rdata for type {rtype}: {reason}")]
    BadRdata { rtype: u16, reason: &'static str },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
