//! IPv6 header parser, including the extension header walk.

use etherparse::Ipv6HeaderSlice;
use smallvec::smallvec;

use super::ethernet::ethertype;
use super::{hint, DecodeContext, FlowEndpoints, Layer, ParseResult, Protocol};
use crate::error::DecodeError;

/// IPv6 fixed header length.
const IPV6_HEADER_LEN: usize = 40;

/// IPv6 next-header values.
pub mod next_header {
    pub const HOP_BY_HOP: u8 = 0;
    pub const UDP: u8 = 17;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const AH: u8 = 51;
    pub const DESTINATION: u8 = 60;
    pub const MOBILITY: u8 = 135;
}

fn is_extension_header(nh: u8) -> bool {
    matches!(
        nh,
        next_header::HOP_BY_HOP
            | next_header::ROUTING
            | next_header::FRAGMENT
            | next_header::DESTINATION
            | next_header::AH
            | next_header::MOBILITY
    )
}

/// IPv6 parser.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Protocol;

impl Protocol for Ipv6Protocol {
    fn name(&self) -> &'static str {
        "ipv6"
    }

    fn display_name(&self) -> &'static str {
        "IPv6"
    }

    fn layer(&self) -> Layer {
        Layer::Network
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        match context.hint(hint::ETHERTYPE) {
            Some(etype) if etype == ethertype::IPV6 as u64 => Some(100),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        let ipv6 = Ipv6HeaderSlice::from_slice(data).map_err(|e| DecodeError::truncated("ipv6", e))?;

        // Payload length 0 means a jumbogram (or an offloaded capture).
        let end = match ipv6.payload_length() as usize {
            0 => data.len(),
            len => (IPV6_HEADER_LEN + len).min(data.len()),
        };
        let payload = &data[IPV6_HEADER_LEN..end];

        let (final_next_header, consumed) = walk_extension_headers(ipv6.next_header().0, payload)?;
        let endpoints = FlowEndpoints::new(ipv6.source_addr(), ipv6.destination_addr());

        Ok(ParseResult::success(
            &payload[consumed..],
            smallvec![
                (hint::IP_PROTOCOL, final_next_header as u64),
                (hint::IP_VERSION, 6),
            ],
        )
        .with_endpoints(endpoints))
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["udp"]
    }
}

/// Skip extension headers, returning the upper-layer protocol and the
/// number of bytes consumed.
fn walk_extension_headers(first_nh: u8, data: &[u8]) -> Result<(u8, usize), DecodeError> {
    let mut offset = 0;
    let mut current_nh = first_nh;

    while is_extension_header(current_nh) {
        let rest = &data[offset..];
        let (next_nh, consumed) = match current_nh {
            next_header::FRAGMENT => parse_fragment_header(rest)?,
            next_header::AH => parse_auth_header(rest)?,
            _ => parse_generic_ext_header(rest)?,
        };
        current_nh = next_nh;
        offset += consumed;
    }

    Ok((current_nh, offset))
}

/// Hop-by-hop, routing, destination options, mobility:
/// length is in 8-octet units, not counting the first 8 octets.
fn parse_generic_ext_header(data: &[u8]) -> Result<(u8, usize), DecodeError> {
    if data.len() < 2 {
        return Err(DecodeError::truncated("ipv6", "extension header"));
    }
    let total_len = (data[1] as usize + 1) * 8;
    if data.len() < total_len {
        return Err(DecodeError::truncated(
            "ipv6",
            format!("extension header needs {} bytes, have {}", total_len, data.len()),
        ));
    }
    Ok((data[0], total_len))
}

/// Authentication header: length is in 4-octet units, minus 2.
fn parse_auth_header(data: &[u8]) -> Result<(u8, usize), DecodeError> {
    if data.len() < 2 {
        return Err(DecodeError::truncated("ipv6", "authentication header"));
    }
    let total_len = (data[1] as usize + 2) * 4;
    if data.len() < total_len {
        return Err(DecodeError::truncated("ipv6", "authentication header"));
    }
    Ok((data[0], total_len))
}

/// Fragment header (8 bytes). An atomic fragment (offset 0, no more
/// fragments) carries a whole datagram and is let through.
fn parse_fragment_header(data: &[u8]) -> Result<(u8, usize), DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::truncated("ipv6", "fragment header"));
    }
    let offset_flags = u16::from_be_bytes([data[2], data[3]]);
    let fragment_offset = offset_flags >> 3;
    let more_fragments = offset_flags & 0x1 != 0;
    if fragment_offset != 0 || more_fragments {
        return Err(DecodeError::Fragmented { protocol: "ipv6" });
    }
    Ok((data[0], 8))
}
