//! Linux cooked capture (SLL) header parser.
//!
//! Captures taken on the "any" interface carry a 16-byte pseudo header
//! instead of a real link-layer header. The protocol field at bytes 14..16
//! is an EtherType for the hardware types that matter here.

use smallvec::smallvec;

use super::{hint, link_type, DecodeContext, Layer, ParseResult, Protocol};
use crate::error::DecodeError;

/// Linux SLL header length in bytes.
pub const LINUX_SLL_HEADER_LEN: usize = 16;

/// ARPHRD hardware types whose SLL protocol field is not an EtherType.
pub mod arphrd {
    pub const NETLINK: u16 = 824;
}

/// Linux SLL parser.
#[derive(Debug, Clone, Copy)]
pub struct LinuxSllProtocol;

impl Protocol for LinuxSllProtocol {
    fn name(&self) -> &'static str {
        "linux_sll"
    }

    fn display_name(&self) -> &'static str {
        "Linux SLL"
    }

    fn layer(&self) -> Layer {
        Layer::Link
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        if context.is_root() && context.link_type == link_type::LINUX_SLL {
            Some(100)
        } else {
            None
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        if data.len() < LINUX_SLL_HEADER_LEN {
            return Err(DecodeError::truncated(
                "linux_sll",
                format!("header needs {} bytes, have {}", LINUX_SLL_HEADER_LEN, data.len()),
            ));
        }

        let arphrd_type = u16::from_be_bytes([data[2], data[3]]);
        let protocol = u16::from_be_bytes([data[14], data[15]]);

        if arphrd_type == arphrd::NETLINK {
            // Netlink family, not an EtherType: leave no hint so the chain stops.
            return Ok(ParseResult::success(&data[LINUX_SLL_HEADER_LEN..], smallvec![]));
        }

        Ok(ParseResult::success(
            &data[LINUX_SLL_HEADER_LEN..],
            smallvec![(hint::ETHERTYPE, protocol as u64)],
        ))
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["ipv4", "ipv6", "vlan"]
    }
}
