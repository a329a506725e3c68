//! Raw IP link types, where the frame starts directly with an IP header.

use smallvec::smallvec;

use super::ethernet::ethertype;
use super::{hint, link_type, DecodeContext, Layer, ParseResult, Protocol};
use crate::error::DecodeError;

/// Pseudo link layer for raw IP captures. Consumes nothing; it only
/// translates the link type (or the IP version nibble) into an EtherType.
#[derive(Debug, Clone, Copy)]
pub struct RawIpProtocol;

impl Protocol for RawIpProtocol {
    fn name(&self) -> &'static str {
        "raw_ip"
    }

    fn display_name(&self) -> &'static str {
        "Raw IP"
    }

    fn layer(&self) -> Layer {
        Layer::Link
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        if !context.is_root() {
            return None;
        }
        match context.link_type {
            link_type::RAW | link_type::RAW_BSD | link_type::RAW_OPENBSD | link_type::IPV4 | link_type::IPV6 => {
                Some(100)
            }
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        let ethertype = match context.link_type {
            link_type::IPV4 => ethertype::IPV4,
            link_type::IPV6 => ethertype::IPV6,
            _ => match data.first().map(|b| b >> 4) {
                Some(4) => ethertype::IPV4,
                Some(6) => ethertype::IPV6,
                Some(_) => 0,
                None => return Err(DecodeError::truncated("raw_ip", "empty frame")),
            },
        };

        Ok(ParseResult::success(data, smallvec![(hint::ETHERTYPE, ethertype as u64)]))
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["ipv4", "ipv6"]
    }
}
