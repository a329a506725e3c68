//! IEEE 802.1Q / 802.1ad VLAN tag parser.

use smallvec::smallvec;

use super::ethernet::ethertype;
use super::{hint, DecodeContext, Layer, ParseResult, Protocol};
use crate::error::DecodeError;

/// Bytes following the TPID: TCI (2) and the inner EtherType (2).
const VLAN_TAG_LEN: usize = 4;

/// VLAN tag parser. Stacked tags are decoded one per layer.
#[derive(Debug, Clone, Copy)]
pub struct VlanProtocol;

impl Protocol for VlanProtocol {
    fn name(&self) -> &'static str {
        "vlan"
    }

    fn display_name(&self) -> &'static str {
        "802.1Q VLAN"
    }

    fn layer(&self) -> Layer {
        Layer::Link
    }

    fn can_parse(&self, context: &DecodeContext) -> Option<u32> {
        match context.hint(hint::ETHERTYPE) {
            Some(etype) if etype == ethertype::VLAN as u64 || etype == ethertype::QINQ as u64 => Some(100),
            _ => None,
        }
    }

    fn parse<'a>(&self, data: &'a [u8], _context: &DecodeContext) -> Result<ParseResult<'a>, DecodeError> {
        // The TPID was the parent's EtherType; what is left is TCI + inner type.
        if data.len() < VLAN_TAG_LEN {
            return Err(DecodeError::truncated(
                "vlan",
                format!("tag needs {} bytes, have {}", VLAN_TAG_LEN, data.len()),
            ));
        }

        let inner_ethertype = u16::from_be_bytes([data[2], data[3]]);

        Ok(ParseResult::success(
            &data[VLAN_TAG_LEN..],
            smallvec![(hint::ETHERTYPE, inner_ethertype as u64)],
        ))
    }

    fn child_protocols(&self) -> &[&'static str] {
        &["ipv4", "ipv6", "vlan"]
    }
}
