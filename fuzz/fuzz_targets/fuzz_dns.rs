//! Fuzz target for the DNS message parser.
//!
//! Exercises:
//! - Header and section count validation
//! - Name decompression (pointer bounds, loop rejection, length limits)
//! - Per-type RDATA decoding
//! - Flattening of whatever parses

#![no_main]

use std::net::Ipv4Addr;

use libfuzzer_sys::fuzz_target;
use pcapdns_core::{flatten, DnsMessage, FlowEndpoints};

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = DnsMessage::parse(data) {
        let endpoints = FlowEndpoints::new(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST);
        let rows = flatten(&message, &endpoints);
        assert_eq!(rows.len(), message.questions.len() + message.answers.len());
    }
});
