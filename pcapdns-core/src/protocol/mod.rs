//! Layer-by-layer frame decoding.
//!
//! A frame is walked from its link-layer header down to a UDP payload by a
//! chain of [`Protocol`] parsers. Each parser consumes its header and leaves
//! hints (ethertype, IP protocol number) that select the next parser from the
//! [`ProtocolRegistry`].
//!
//! | Layer | Protocols |
//! |-------|-----------|
//! | Link | Ethernet II, 802.1Q/802.1ad VLAN, Linux cooked capture, raw IP |
//! | Network | IPv4, IPv6 (with extension headers) |
//! | Transport | UDP |

mod context;
pub mod ethernet;
mod ipv4;
pub mod ipv6;
pub mod linux_sll;
mod raw_ip;
mod registry;
mod udp;
mod vlan;

#[cfg(test)]
pub mod test_utils;

pub use context::{
    hint, ip_text, ipv6_text, DecodeContext, DecodedFrame, FlowEndpoints, HintEntry, Layer,
    ParseResult,
};
pub use ethernet::EthernetProtocol;
pub use ipv4::Ipv4Protocol;
pub use ipv6::Ipv6Protocol;
pub use linux_sll::LinuxSllProtocol;
pub use raw_ip::RawIpProtocol;
pub use registry::{BuiltinProtocol, PayloadMode, Protocol, ProtocolRegistry};
pub use udp::UdpProtocol;
pub use vlan::VlanProtocol;

use crate::error::DecodeError;

/// Capture link types understood at the root of the chain.
pub mod link_type {
    pub const ETHERNET: u16 = 1;
    /// DLT_RAW as written by some BSDs.
    pub const RAW_BSD: u16 = 12;
    /// DLT_RAW as written by OpenBSD.
    pub const RAW_OPENBSD: u16 = 14;
    pub const RAW: u16 = 101;
    pub const LINUX_SLL: u16 = 113;
    pub const IPV4: u16 = 228;
    pub const IPV6: u16 = 229;
}

/// Upper bound on decoded layers per frame (stacked VLAN tags, extension headers).
pub const MAX_LAYERS: usize = 8;

/// Create a registry with every built-in parser.
pub fn default_registry() -> ProtocolRegistry {
    let mut registry = ProtocolRegistry::new();

    // Layer 2
    registry.register(EthernetProtocol);
    registry.register(LinuxSllProtocol);
    registry.register(RawIpProtocol);
    registry.register(VlanProtocol);

    // Layer 3
    registry.register(Ipv4Protocol);
    registry.register(Ipv6Protocol);

    // Layer 4
    registry.register(UdpProtocol);

    registry
}

/// Decode a frame down to its UDP payload.
///
/// Fails with the first layer that is absent, unsupported, truncated, or
/// fragmented. Never panics on arbitrary input.
pub fn decode_frame<'a>(
    registry: &ProtocolRegistry,
    link_type: u16,
    data: &'a [u8],
) -> Result<DecodedFrame<'a>, DecodeError> {
    let mut context = DecodeContext::new(link_type);
    let mut remaining = data;

    while context.depth < MAX_LAYERS {
        let parser = registry
            .find_parser(&context)
            .ok_or_else(|| context.unsupported())?;

        let result = parser.parse(remaining, &context)?;
        let consumed = remaining.len() - result.remaining.len();
        context.advance(parser.name(), parser.layer(), consumed, &result);

        if parser.payload_mode() == PayloadMode::Application {
            let endpoints = context.endpoints.ok_or(DecodeError::MissingNetworkLayer)?;
            let src_port = result.hint(hint::SRC_PORT).unwrap_or(0) as u16;
            let dst_port = result.hint(hint::DST_PORT).unwrap_or(0) as u16;
            return Ok(DecodedFrame {
                endpoints,
                src_port,
                dst_port,
                payload: result.remaining,
            });
        }

        remaining = result.remaining;
    }

    Err(DecodeError::TooManyLayers { limit: MAX_LAYERS })
}
