//! Ethernet II header parser.

use etherparse::Ethernet2HeaderSlice;
use smallvec::smallvec;

use super::{hint, link_type, DecodeContext, Layer, ParseResult, Protocol};
use crate::error::DecodeError;

/// EtherType values the decode chain cares about.
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const QINQ: u16 = 0x88A8;
}

/// Ethernet II parser.
#[derive(Debug, Clone, Copy)]
pub struct EthernetProtocol;

impl Protocol for EthernetProtocol {
    fn name(&self) -> &'static str {
        "ethernet"
    }

    fn display_name(&self) -> &'static str {
        "Ethernet II"
    }

    fn layer(&self) -> Layer {
        Layer::Link
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        if context.is_root() && context.link_type == link_type::ETHERNET {
            Some(100)
        } else {
            None
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        let eth = Ethernet2HeaderSlice::from_slice(data).map_err(|e| DecodeError::truncated("ethernet", e))?;
        let header_len = eth.slice().len();

        Ok(ParseResult::success(
            &data[header_len..],
            smallvec![(hint::ETHERTYPE, eth.ether_type().0 as u64)],
        ))
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["ipv4", "ipv6", "vlan"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::test_utils::EthernetBuilder;

    #[test]
    fn test_can_parse_only_at_root() {
        let parser = EthernetProtocol;
        assert_eq!(parser.can_parse(&DecodeContext::new(link_type::ETHERNET)), Some(100));
        assert_eq!(parser.can_parse(&DecodeContext::new(link_type::LINUX_SLL)), None);

        let mut ctx = DecodeContext::new(link_type::ETHERNET);
        ctx.parent_protocol = Some("vlan");
        assert_eq!(parser.can_parse(&ctx), None);
    }

    #[test]
    fn test_parse_sets_ethertype() {
        let frame = EthernetBuilder::new().ipv6().payload(vec![0xde, 0xad]).build();
        let result = EthernetProtocol
            .parse(&frame, &DecodeContext::new(link_type::ETHERNET))
            .unwrap();

        assert_eq!(result.hint(hint::ETHERTYPE), Some(ethertype::IPV6 as u64));
        assert_eq!(result.remaining, &[0xde, 0xad]);
    }

    #[test]
    fn test_parse_short_frame() {
        let err = EthernetProtocol
            .parse(&[0u8; 13], &DecodeContext::new(link_type::ETHERNET))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { protocol: "ethernet", .. }));
    }
}
