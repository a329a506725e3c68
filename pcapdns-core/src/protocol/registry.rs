//! Protocol registry for managing parsers.

use crate::error::DecodeError;

use super::{
    DecodeContext, EthernetProtocol, Ipv4Protocol, Ipv6Protocol, Layer, LinuxSllProtocol,
    ParseResult, RawIpProtocol, UdpProtocol, VlanProtocol,
};

/// How a protocol's remaining bytes should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Remaining bytes go to the next parser (default).
    Chain,

    /// Remaining bytes are the application payload; decoding stops.
    Application,
}

/// Core trait all layer parsers implement.
pub trait Protocol: Send + Sync {
    /// Unique identifier for this protocol (e.g., "ipv4", "udp").
    fn name(&self) -> &'static str;

    /// Human-readable display name.
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Layer this parser decodes.
    fn layer(&self) -> Layer;

    /// Check if this parser can handle the given context.
    /// Returns a priority score (higher = more specific match).
    fn can_parse(&self, context: &DecodeContext) -> Option<u32>;

    /// Decode one header, returning the bytes that follow it.
    fn parse<'a>(&self, data: &'a [u8], context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError>;

    /// Protocols that might follow this one.
    fn child_protocols(&self) -> &[&'static str] {
        &[]
    }

    /// How should remaining bytes be handled after parsing?
    fn payload_mode(&self) -> PayloadMode {
        PayloadMode::Chain
    }
}

/// Enum of all built-in parsers, for static dispatch.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinProtocol {
    Ethernet(EthernetProtocol),
    LinuxSll(LinuxSllProtocol),
    RawIp(RawIpProtocol),
    Vlan(VlanProtocol),
    Ipv4(Ipv4Protocol),
    Ipv6(Ipv6Protocol),
    Udp(UdpProtocol),
}

macro_rules! delegate_protocol {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            BuiltinProtocol::Ethernet(p) => p.$method($($arg),*),
            BuiltinProtocol::LinuxSll(p) => p.$method($($arg),*),
            BuiltinProtocol::RawIp(p) => p.$method($($arg),*),
            BuiltinProtocol::Vlan(p) => p.$method($($arg),*),
            BuiltinProtocol::Ipv4(p) => p.$method($($arg),*),
            BuiltinProtocol::Ipv6(p) => p.$method($($arg),*),
            BuiltinProtocol::Udp(p) => p.$method($($arg),*),
        }
    };
}

impl Protocol for BuiltinProtocol {
    #[inline]
    fn name(&self) -> &'static str {
        delegate_protocol!(self, name)
    }

    #[inline]
    fn display_name(&self) -> &'static str {
        delegate_protocol!(self, display_name)
    }

    #[inline]
    fn layer(&self) -> Layer {
        delegate_protocol!(self, layer)
    }

    #[inline]
    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        delegate_protocol!(self, can_parse, context)
    }

    #[inline]
    fn parse<'a>(&self, data: &'a [u8], context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        delegate_protocol!(self, parse, data, context)
    }

    #[inline]
    fn child_protocols(&self) -> &[&'static str] {
        delegate_protocol!(self, child_protocols)
    }

    #[inline]
    fn payload_mode(&self) -> PayloadMode {
        delegate_protocol!(self, payload_mode)
    }
}

macro_rules! impl_from_protocol {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for BuiltinProtocol {
                fn from(p: $ty) -> Self {
                    BuiltinProtocol::$variant(p)
                }
            }
        )*
    };
}

impl_from_protocol! {
    Ethernet => EthernetProtocol,
    LinuxSll => LinuxSllProtocol,
    RawIp => RawIpProtocol,
    Vlan => VlanProtocol,
    Ipv4 => Ipv4Protocol,
    Ipv6 => Ipv6Protocol,
    Udp => UdpProtocol,
}

/// Registry of available layer parsers.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    parsers: Vec<BuiltinProtocol>,
}

impl ProtocolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser.
    pub fn register<P: Into<BuiltinProtocol>>(&mut self, parser: P) {
        self.parsers.push(parser.into());
    }

    /// Find the best parser for the given context.
    ///
    /// Ties go to the parser registered first.
    pub fn find_parser(&self, context: &DecodeContext) -> Option<&BuiltinProtocol> {
        let mut best: Option<(&BuiltinProtocol, u32)> = None;
        for parser in &self.parsers {
            if let Some(priority) = parser.can_parse(context) {
                if best.map_or(true, |(_, p)| priority > p) {
                    best = Some((parser, priority));
                }
            }
        }
        best.map(|(parser, _)| parser)
    }

    /// Get a parser by name.
    pub fn get_parser(&self, name: &str) -> Option<&BuiltinProtocol> {
        self.parsers.iter().find(|p| p.name() == name)
    }

    /// All registered parsers, in registration order.
    pub fn all_parsers(&self) -> impl Iterator<Item = &BuiltinProtocol> {
        self.parsers.iter()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
