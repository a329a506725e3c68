//! Decode context and per-layer result types.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use smallvec::SmallVec;

use crate::error::DecodeError;

/// Hint entry for child protocol detection: (hint_name, value).
pub type HintEntry = (&'static str, u64);

/// Well-known hint keys passed between layers.
pub mod hint {
    pub const ETHERTYPE: &str = "ethertype";
    pub const IP_PROTOCOL: &str = "ip_protocol";
    pub const IP_VERSION: &str = "ip_version";
    pub const SRC_PORT: &str = "src_port";
    pub const DST_PORT: &str = "dst_port";
}

/// Which part of the stack a parser handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Link,
    Network,
    Transport,
}

/// Network-layer source and destination of a datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEndpoints {
    pub src: IpAddr,
    pub dst: IpAddr,
}

impl FlowEndpoints {
    pub fn new(src: impl Into<IpAddr>, dst: impl Into<IpAddr>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Source address as text (dotted quad, or eight full IPv6 groups).
    pub fn src_text(&self) -> String {
        ip_text(&self.src)
    }

    /// Destination address as text.
    pub fn dst_text(&self) -> String {
        ip_text(&self.dst)
    }
}

/// Render an address the way rows carry it.
pub fn ip_text(addr: &IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => ipv6_text(v6),
    }
}

/// Eight colon-separated lowercase hex groups, no `::` compression.
pub fn ipv6_text(addr: &Ipv6Addr) -> String {
    let [a, b, c, d, e, f, g, h] = addr.segments();
    format!("{a:x}:{b:x}:{c:x}:{d:x}:{e:x}:{f:x}:{g:x}:{h:x}")
}

impl fmt::Display for FlowEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src_text(), self.dst_text())
    }
}

/// A frame decoded down to its UDP payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'data> {
    pub endpoints: FlowEndpoints,
    pub src_port: u16,
    pub dst_port: u16,
    /// UDP payload, trimmed to the length the headers declare.
    pub payload: &'data [u8],
}

/// State threaded through the decode chain.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    /// Link type from the capture header (e.g., 1 = Ethernet).
    pub link_type: u16,

    /// Protocol that handed over the current bytes.
    pub parent_protocol: Option<&'static str>,

    /// Layer of the parent protocol.
    pub parent_layer: Option<Layer>,

    /// Hints left by the parent (ethertype, IP protocol number, ...).
    pub hints: SmallVec<[HintEntry; 4]>,

    /// Offset into the frame where the current bytes start.
    pub offset: usize,

    /// Number of layers decoded so far.
    pub depth: usize,

    /// Addresses of the innermost network layer seen.
    pub endpoints: Option<FlowEndpoints>,
}

impl DecodeContext {
    pub fn new(link_type: u16) -> Self {
        Self {
            link_type,
            parent_protocol: None,
            parent_layer: None,
            hints: SmallVec::new(),
            offset: 0,
            depth: 0,
            endpoints: None,
        }
    }

    /// Get a hint value by key (linear search, but N is small).
    #[inline]
    pub fn hint(&self, key: &str) -> Option<u64> {
        self.hints.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Insert a hint value (appends, may create duplicates).
    #[inline]
    pub fn insert_hint(&mut self, key: &'static str, value: u64) {
        self.hints.push((key, value));
    }

    /// Set a hint value (updates existing or appends).
    #[inline]
    pub fn set_hint(&mut self, key: &'static str, value: u64) {
        if let Some(entry) = self.hints.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.hints.push((key, value));
        }
    }

    /// Check if we're at the start of the frame (no parent protocol).
    pub fn is_root(&self) -> bool {
        self.parent_protocol.is_none()
    }

    /// Move past a decoded layer.
    pub(crate) fn advance(
        &mut self,
        protocol: &'static str,
        layer: Layer,
        consumed: usize,
        result: &ParseResult<'_>,
    ) {
        self.parent_protocol = Some(protocol);
        self.parent_layer = Some(layer);
        self.hints = result.child_hints.clone();
        self.offset += consumed;
        self.depth += 1;
        if let Some(endpoints) = result.endpoints {
            self.endpoints = Some(endpoints);
        }
    }

    /// Error describing why no parser accepted the current bytes.
    pub(crate) fn unsupported(&self) -> DecodeError {
        match self.parent_layer {
            None => DecodeError::UnsupportedLinkType {
                link_type: self.link_type,
            },
            Some(Layer::Link) => DecodeError::UnsupportedNetworkType {
                ethertype: self.hint(hint::ETHERTYPE).unwrap_or(0) as u16,
            },
            Some(Layer::Network) | Some(Layer::Transport) => DecodeError::UnsupportedTransport {
                ip_protocol: self.hint(hint::IP_PROTOCOL).unwrap_or(0) as u8,
            },
        }
    }
}

/// Result of decoding one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<'data> {
    /// Bytes for the next layer.
    pub remaining: &'data [u8],

    /// Hints for child protocol identification.
    pub child_hints: SmallVec<[HintEntry; 4]>,

    /// Addresses, set by network-layer parsers.
    pub endpoints: Option<FlowEndpoints>,
}

impl<'data> ParseResult<'data> {
    pub fn success(remaining: &'data [u8], child_hints: SmallVec<[HintEntry; 4]>) -> Self {
        Self {
            remaining,
            child_hints,
            endpoints: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: FlowEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Get a child hint by key.
    pub fn hint(&self, key: &str) -> Option<u64> {
        self.child_hints.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}
