//! PCAP/PCAPNG reading over any `Read` source.
//!
//! Block parsing is delegated to `pcap_parser`; this module keeps track of
//! the link type announced by file and interface headers, numbers frames,
//! and normalises timestamps to microseconds.
//!
//! PCAPNG frames are resolved against the interface table of the current
//! section: each Enhanced Packet Block carries its own link type, timestamp
//! resolution and offset through the interface it names.

use std::io::{BufReader, Read};

use bytes::Bytes;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapNGReader};
use tracing::{debug, trace};

use crate::error::{Error, PcapError};
use crate::io::{PacketReader, RawPacket};

/// Buffer size for pcap_parser readers (256KB).
const BUFFER_SIZE: usize = 262144;

/// Link type assumed until a header says otherwise.
const DEFAULT_LINK_TYPE: u16 = 1;

/// PCAPNG timestamp units per second when an interface does not say.
const DEFAULT_TS_RESOLUTION: u64 = 1_000_000;

/// Format of the capture file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcapFormat {
    /// Classic PCAP (little-endian, microseconds)
    LegacyLeMicro,
    /// Classic PCAP (big-endian, microseconds)
    LegacyBeMicro,
    /// Classic PCAP (little-endian, nanoseconds)
    LegacyLeNano,
    /// Classic PCAP (big-endian, nanoseconds)
    LegacyBeNano,
    /// PCAPNG format
    PcapNg,
}

impl PcapFormat {
    /// Detect the format from the first four bytes of the capture.
    pub fn detect(data: &[u8]) -> Result<Self, Error> {
        let Some(magic) = data.get(..4) else {
            return Err(PcapError::InvalidFormat {
                reason: "data too small for capture magic".into(),
            }
            .into());
        };

        let magic = u32::from_ne_bytes([magic[0], magic[1], magic[2], magic[3]]);

        match magic {
            0xa1b2c3d4 => Ok(PcapFormat::LegacyLeMicro),
            0xd4c3b2a1 => Ok(PcapFormat::LegacyBeMicro),
            0xa1b23c4d => Ok(PcapFormat::LegacyLeNano),
            0x4d3cb2a1 => Ok(PcapFormat::LegacyBeNano),
            0x0a0d0d0a => Ok(PcapFormat::PcapNg),
            _ => Err(PcapError::InvalidFormat {
                reason: format!("unknown capture magic: 0x{:08x}", magic),
            }
            .into()),
        }
    }

    /// Whether this is a PCAPNG format.
    pub fn is_pcapng(&self) -> bool {
        matches!(self, PcapFormat::PcapNg)
    }

    /// Whether per-record timestamps carry nanoseconds instead of microseconds.
    pub fn is_nanosecond(&self) -> bool {
        matches!(self, PcapFormat::LegacyLeNano | PcapFormat::LegacyBeNano)
    }
}

/// PCAP/PCAPNG reader over any `Read` source.
pub struct GenericPcapReader<R: Read> {
    inner: ReaderInner<R>,
    format: PcapFormat,
    frame_number: u64,
    link_type: u16,
    interfaces: Vec<NgInterface>,
}

/// Interface Description Block state needed to decode packets on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NgInterface {
    link_type: u16,
    /// Timestamp units per second.
    resolution: u64,
    /// Seconds added to every timestamp.
    offset: i64,
}

impl NgInterface {
    /// Convert raw timestamp ticks on this interface to microseconds.
    fn timestamp_us(&self, ts_high: u32, ts_low: u32) -> i64 {
        let ticks = (u64::from(ts_high) << 32) | u64::from(ts_low);
        let secs = ticks / self.resolution;
        let frac = ticks % self.resolution;
        let frac_us = (u128::from(frac) * 1_000_000 / u128::from(self.resolution)) as i64;
        let secs = i64::try_from(secs).unwrap_or(i64::MAX).saturating_add(self.offset);
        secs.saturating_mul(1_000_000).saturating_add(frac_us)
    }
}

/// Units per second for an `if_tsresol` option value.
///
/// The high bit selects a power of two, otherwise a power of ten.
/// `pcap_parser::build_ts_resolution` compares the flagged byte against the
/// exponent limit and so rejects every binary resolution.
fn ts_resolution(if_tsresol: u8) -> Option<u64> {
    let exponent = u32::from(if_tsresol & 0x7f);
    if if_tsresol & 0x80 == 0 {
        10u64.checked_pow(exponent)
    } else {
        1u64.checked_shl(exponent)
    }
}

enum ReaderInner<R: Read> {
    Legacy(LegacyPcapReader<BufReader<R>>),
    Ng(PcapNGReader<BufReader<R>>),
}

/// Per-reader bookkeeping shared by the legacy and PCAPNG paths.
struct FrameCounter<'a> {
    frame_number: &'a mut u64,
    link_type: &'a mut u16,
}

impl FrameCounter<'_> {
    fn emit(&mut self, timestamp_us: i64, captured_len: u32, original_len: u32, data: &[u8]) -> RawPacket {
        *self.frame_number += 1;
        RawPacket {
            frame_number: *self.frame_number,
            timestamp_us,
            captured_len,
            original_len,
            link_type: *self.link_type,
            data: Bytes::copy_from_slice(data),
        }
    }
}

impl<R: Read> GenericPcapReader<R> {
    /// Create a reader for a source whose format is already known.
    ///
    /// Use [`PcapFormat::detect`] on the leading bytes first.
    pub fn with_format(source: R, format: PcapFormat) -> Result<Self, Error> {
        let buf_reader = BufReader::with_capacity(BUFFER_SIZE, source);

        let inner = if format.is_pcapng() {
            let reader = PcapNGReader::new(BUFFER_SIZE, buf_reader).map_err(|e| PcapError::InvalidFormat {
                reason: format!("failed to parse PCAPNG: {}", e),
            })?;
            ReaderInner::Ng(reader)
        } else {
            let reader = LegacyPcapReader::new(BUFFER_SIZE, buf_reader).map_err(|e| PcapError::InvalidFormat {
                reason: format!("failed to parse legacy PCAP: {}", e),
            })?;
            ReaderInner::Legacy(reader)
        };

        Ok(GenericPcapReader {
            inner,
            format,
            frame_number: 0,
            link_type: DEFAULT_LINK_TYPE,
            interfaces: Vec::new(),
        })
    }

    /// Format this reader was created with.
    pub fn format(&self) -> PcapFormat {
        self.format
    }

    /// Read the next frame. Returns `Ok(None)` at end of input.
    pub fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        let nanos = self.format.is_nanosecond();
        let mut counter = FrameCounter {
            frame_number: &mut self.frame_number,
            link_type: &mut self.link_type,
        };
        match &mut self.inner {
            ReaderInner::Legacy(reader) => read_legacy_packet(reader, &mut counter, nanos),
            ReaderInner::Ng(reader) => read_pcapng_packet(reader, &mut counter, &mut self.interfaces),
        }
    }
}

impl<R: Read + Send> PacketReader for GenericPcapReader<R> {
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        GenericPcapReader::next_packet(self)
    }

    fn link_type(&self) -> u16 {
        self.link_type
    }

    fn frame_count(&self) -> u64 {
        self.frame_number
    }
}

fn read_legacy_packet<S: Read>(
    reader: &mut LegacyPcapReader<S>,
    counter: &mut FrameCounter<'_>,
    nanos: bool,
) -> Result<Option<RawPacket>, Error> {
    use pcap_parser::PcapError as PcapParserError;

    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let packet = match block {
                    PcapBlockOwned::Legacy(packet) => {
                        let subsec = if nanos {
                            i64::from(packet.ts_usec) / 1_000
                        } else {
                            i64::from(packet.ts_usec)
                        };
                        let timestamp_us = i64::from(packet.ts_sec) * 1_000_000 + subsec;
                        Some(counter.emit(timestamp_us, packet.caplen, packet.origlen, packet.data))
                    }
                    PcapBlockOwned::LegacyHeader(header) => {
                        *counter.link_type = header.network.0 as u16;
                        trace!(link_type = *counter.link_type, "legacy capture header");
                        None
                    }
                    _ => None,
                };
                reader.consume(offset);
                if packet.is_some() {
                    return Ok(packet);
                }
            }
            Err(PcapParserError::Eof) => return Ok(None),
            Err(PcapParserError::Incomplete(_)) => {
                reader.refill().map_err(|e| PcapError::InvalidFormat {
                    reason: format!("legacy PCAP refill error: {}", e),
                })?;
            }
            Err(e) => {
                return Err(PcapError::InvalidFormat {
                    reason: format!("legacy PCAP parse error: {}", e),
                }
                .into());
            }
        }
    }
}

fn read_pcapng_packet<S: Read>(
    reader: &mut PcapNGReader<S>,
    counter: &mut FrameCounter<'_>,
    interfaces: &mut Vec<NgInterface>,
) -> Result<Option<RawPacket>, Error> {
    use pcap_parser::pcapng::Block;
    use pcap_parser::PcapError as PcapParserError;
    use pcap_parser::traits::PcapNGPacketBlock;

    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let packet = match block {
                    PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                        // Interface ids are scoped to their section.
                        interfaces.clear();
                        Ok(None)
                    }
                    PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
                        let resolution = ts_resolution(idb.if_tsresol).unwrap_or_else(|| {
                            debug!(if_tsresol = idb.if_tsresol, "invalid interface timestamp resolution");
                            DEFAULT_TS_RESOLUTION
                        });
                        let interface = NgInterface {
                            link_type: idb.linktype.0 as u16,
                            resolution,
                            offset: idb.ts_offset(),
                        };
                        trace!(
                            if_id = interfaces.len(),
                            link_type = interface.link_type,
                            resolution,
                            "pcapng interface description"
                        );
                        interfaces.push(interface);
                        Ok(None)
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => match interfaces.get(epb.if_id as usize) {
                        Some(interface) => {
                            *counter.link_type = interface.link_type;
                            let timestamp_us = interface.timestamp_us(epb.ts_high, epb.ts_low);
                            Ok(Some(counter.emit(timestamp_us, epb.caplen, epb.origlen, epb.packet_data())))
                        }
                        None => Err(PcapError::InvalidFormat {
                            reason: format!("packet references undeclared interface {}", epb.if_id),
                        }),
                    },
                    PcapBlockOwned::NG(Block::SimplePacket(spb)) => match interfaces.first() {
                        Some(interface) => {
                            *counter.link_type = interface.link_type;
                            let data = spb.packet_data();
                            Ok(Some(counter.emit(0, data.len() as u32, spb.origlen, data)))
                        }
                        None => Err(PcapError::InvalidFormat {
                            reason: "simple packet before any interface description".into(),
                        }),
                    },
                    _ => Ok(None),
                };
                reader.consume(offset);
                match packet {
                    Ok(Some(packet)) => return Ok(Some(packet)),
                    Ok(None) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            Err(PcapParserError::Eof) => return Ok(None),
            Err(PcapParserError::Incomplete(_)) => {
                reader.refill().map_err(|e| PcapError::InvalidFormat {
                    reason: format!("PCAPNG refill error: {}", e),
                })?;
            }
            Err(e) => {
                return Err(PcapError::InvalidFormat {
                    reason: format!("PCAPNG parse error: {}", e),
                }
                .into());
            }
        }
    }
}
