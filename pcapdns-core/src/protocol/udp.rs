//! UDP header parser, the last layer before the DNS payload.

use etherparse::UdpHeaderSlice;
use smallvec::smallvec;

use super::{hint, DecodeContext, Layer, ParseResult, PayloadMode, Protocol};
use crate::error::DecodeError;

/// IP protocol number for UDP.
const IP_PROTOCOL_UDP: u64 = 17;

const UDP_HEADER_LEN: usize = 8;

/// UDP parser.
#[derive(Debug, Clone, Copy)]
pub struct UdpProtocol;

impl Protocol for UdpProtocol {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn display_name(&self) -> &'static str {
        "UDP"
    }

    fn layer(&self) -> Layer {
        Layer::Transport
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        match context.hint(hint::IP_PROTOCOL) {
            Some(IP_PROTOCOL_UDP) => Some(100),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        let udp = UdpHeaderSlice::from_slice(data).map_err(|e| DecodeError::truncated("udp", e))?;

        // Lengths below the header size (0 for jumbograms) carry no
        // information; use what was captured.
        let end = match udp.length() as usize {
            len if len < UDP_HEADER_LEN => data.len(),
            len => len.min(data.len()),
        };

        Ok(ParseResult::success(
            &data[UDP_HEADER_LEN..end],
            smallvec![
                (hint::SRC_PORT, udp.source_port() as u64),
                (hint::DST_PORT, udp.destination_port() as u64),
            ],
        ))
    }

    fn payload_mode(&self) -> PayloadMode {
        PayloadMode::Application
    }
}
