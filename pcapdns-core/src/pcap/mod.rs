//! Capture file reading.
//!
//! [`PcapReader`] opens a file, sniffs compression and capture format, and
//! yields [`crate::io::RawPacket`]s.

mod reader;

pub use reader::PcapReader;
