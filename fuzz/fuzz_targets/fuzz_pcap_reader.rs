//! Fuzz target for capture parsing through the record reader.
//!
//! Malformed PCAP/PCAPNG input must end in `Ok(None)` or a single error,
//! never a panic.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use pcapdns_core::io::{GenericPcapReader, PcapFormat};
use pcapdns_core::DnsRecordReader;

fuzz_target!(|data: &[u8]| {
    let Ok(format) = PcapFormat::detect(data) else {
        return;
    };
    let Ok(source) = GenericPcapReader::with_format(Cursor::new(data.to_vec()), format) else {
        return;
    };

    let mut reader = DnsRecordReader::new(source);
    while let Ok(Some(_)) = reader.next_record() {}
    assert!(reader.next_record().map_or(true, |row| row.is_none()));
});
