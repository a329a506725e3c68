//! IPv4 header parser.

use etherparse::Ipv4HeaderSlice;
use smallvec::smallvec;

use super::ethernet::ethertype;
use super::{hint, DecodeContext, FlowEndpoints, Layer, ParseResult, Protocol};
use crate::error::DecodeError;

/// IPv4 parser.
///
/// The payload handed on is cut at the header's total length, so Ethernet
/// padding never reaches the transport layer. Fragments are rejected.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Protocol;

impl Protocol for Ipv4Protocol {
    fn name(&self) -> &'static str {
        "ipv4"
    }

    fn display_name(&self) -> &'static str {
        "IPv4"
    }

    fn layer(&self) -> Layer {
        Layer::Network
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        match context.hint(hint::ETHERTYPE) {
            Some(etype) if etype == ethertype::IPV4 as u64 => Some(100),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        let ipv4 = Ipv4HeaderSlice::from_slice(data).map_err(|e| DecodeError::truncated("ipv4", e))?;
        let header_len = ipv4.slice().len();

        if ipv4.more_fragments() || ipv4.fragments_offset().value() != 0 {
            return Err(DecodeError::Fragmented { protocol: "ipv4" });
        }

        // A zero total length shows up on segmentation-offloaded captures;
        // fall back to what was captured.
        let total_len = match ipv4.total_len() as usize {
            0 => data.len(),
            len if len < header_len => {
                return Err(DecodeError::truncated(
                    "ipv4",
                    format!("total length {} shorter than header ({})", len, header_len),
                ));
            }
            len => len.min(data.len()),
        };

        let endpoints = FlowEndpoints::new(ipv4.source_addr(), ipv4.destination_addr());

        Ok(ParseResult::success(
            &data[header_len..total_len],
            smallvec![
                (hint::IP_PROTOCOL, ipv4.protocol().0 as u64),
                (hint::IP_VERSION, 4),
            ],
        )
        .with_endpoints(endpoints))
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["udp"]
    }
}
