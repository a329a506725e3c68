//! Fuzz target for the link/network/UDP decoding chain.
//!
//! Every root link type is tried on the same bytes, and any UDP payload
//! that falls out is handed to the DNS parser.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pcapdns_core::protocol::link_type;
use pcapdns_core::{decode_frame, default_registry, DnsMessage};

fuzz_target!(|data: &[u8]| {
    let registry = default_registry();

    for link in [
        link_type::ETHERNET,
        link_type::LINUX_SLL,
        link_type::RAW,
        link_type::IPV4,
        link_type::IPV6,
    ] {
        if let Ok(frame) = decode_frame(&registry, link, data) {
            assert!(frame.payload.len() <= data.len());
            let _ = DnsMessage::parse(frame.payload);
        }
    }
});
