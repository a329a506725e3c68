//! Pull-based iterator turning captured frames into DNS rows.
//!
//! [`DnsRecordReader`] reads one frame at a time from a [`PacketReader`],
//! decodes it down to a UDP payload, parses that as a DNS message and
//! buffers the flattened rows. Each call hands out one buffered row; a new
//! frame is read only once the buffer is empty.
//!
//! Frames that do not carry a DNS message are skipped and counted in
//! [`ReaderStats`]. Only failures of the frame source itself reach the
//! caller, once, after which the reader is exhausted.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::dns::DnsMessage;
use crate::error::{DecodeError, Error};
use crate::io::{PacketReader, RawPacket};
use crate::protocol::{decode_frame, default_registry, DecodedFrame, FlowEndpoints, ProtocolRegistry};
use crate::record::{flatten_into, KeyedRecord, OutputRecord};

/// Reader settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    /// UDP ports to accept. `None` tries every UDP payload as DNS.
    pub ports: Option<Vec<u16>>,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept datagrams whose source or destination port is listed.
    pub fn with_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.ports = Some(ports.into_iter().collect());
        self
    }

    /// Apply the port filter to a decoded frame.
    pub fn check(&self, frame: &DecodedFrame<'_>) -> Result<(), DecodeError> {
        match &self.ports {
            Some(ports) if !ports.contains(&frame.src_port) && !ports.contains(&frame.dst_port) => {
                Err(DecodeError::PortFiltered {
                    src_port: frame.src_port,
                    dst_port: frame.dst_port,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Where the reader is between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Buffer empty; the next call reads frames.
    AwaitingFrame,
    /// Buffered rows remain from the last decoded frame.
    Draining,
    /// End of stream, source failure, or closed. Terminal.
    Exhausted,
}

/// Counters describing what happened to each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Frames read from the source
    pub frames: u64,
    /// Unknown link type or too deeply nested
    pub skipped_link: u64,
    /// Not IPv4 or IPv6
    pub skipped_network: u64,
    /// Not UDP
    pub skipped_transport: u64,
    pub skipped_truncated: u64,
    pub skipped_fragments: u64,
    pub skipped_port: u64,
    /// UDP payloads that failed to parse as DNS
    pub malformed_dns: u64,
    /// DNS messages parsed
    pub messages: u64,
    /// Messages with no questions and no answers
    pub empty_messages: u64,
    /// Rows produced
    pub records: u64,
}

impl ReaderStats {
    /// Total frames that produced no DNS message.
    pub fn skipped(&self) -> u64 {
        self.skipped_link
            + self.skipped_network
            + self.skipped_transport
            + self.skipped_truncated
            + self.skipped_fragments
            + self.skipped_port
            + self.malformed_dns
    }

    fn record_skip(&mut self, err: &DecodeError) {
        let counter = match err {
            DecodeError::UnsupportedLinkType { .. } | DecodeError::TooManyLayers { .. } => {
                &mut self.skipped_link
            }
            DecodeError::UnsupportedNetworkType { .. } | DecodeError::MissingNetworkLayer => {
                &mut self.skipped_network
            }
            DecodeError::UnsupportedTransport { .. } => &mut self.skipped_transport,
            DecodeError::Truncated { .. } => &mut self.skipped_truncated,
            DecodeError::Fragmented { .. } => &mut self.skipped_fragments,
            DecodeError::PortFiltered { .. } => &mut self.skipped_port,
        };
        *counter += 1;
    }
}

impl fmt::Display for ReaderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:            {}", self.frames)?;
        writeln!(f, "dns messages:      {}", self.messages)?;
        writeln!(f, "  empty:           {}", self.empty_messages)?;
        writeln!(f, "records:           {}", self.records)?;
        writeln!(f, "skipped:           {}", self.skipped())?;
        writeln!(f, "  link layer:      {}", self.skipped_link)?;
        writeln!(f, "  network layer:   {}", self.skipped_network)?;
        writeln!(f, "  not udp:         {}", self.skipped_transport)?;
        writeln!(f, "  truncated:       {}", self.skipped_truncated)?;
        writeln!(f, "  fragments:       {}", self.skipped_fragments)?;
        writeln!(f, "  port filter:     {}", self.skipped_port)?;
        write!(f, "  malformed dns:   {}", self.malformed_dns)
    }
}

/// Iterator over the DNS rows of a frame source.
pub struct DnsRecordReader<R> {
    source: Option<R>,
    registry: ProtocolRegistry,
    config: ReaderConfig,
    pending: VecDeque<OutputRecord>,
    pending_key: i64,
    state: ReaderState,
    stats: ReaderStats,
}

impl<R: PacketReader> DnsRecordReader<R> {
    /// Read every UDP payload in `source` as DNS.
    pub fn new(source: R) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    pub fn with_config(source: R, config: ReaderConfig) -> Self {
        Self {
            source: Some(source),
            registry: default_registry(),
            config,
            pending: VecDeque::new(),
            pending_key: 0,
            state: ReaderState::AwaitingFrame,
            stats: ReaderStats::default(),
        }
    }

    /// Return the next row with its key, `Ok(None)` once the source is done.
    pub fn next_record(&mut self) -> Result<Option<KeyedRecord>, Error> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                self.state = if self.pending.is_empty() {
                    ReaderState::AwaitingFrame
                } else {
                    ReaderState::Draining
                };
                return Ok(Some((self.pending_key, record)));
            }

            let Some(source) = self.source.as_mut() else {
                self.state = ReaderState::Exhausted;
                return Ok(None);
            };

            match source.next_packet() {
                Ok(Some(packet)) => {
                    self.stats.frames += 1;
                    self.process(&packet);
                }
                Ok(None) => {
                    info!(
                        frames = self.stats.frames,
                        messages = self.stats.messages,
                        records = self.stats.records,
                        skipped = self.stats.skipped(),
                        "end of capture"
                    );
                    self.close();
                    return Ok(None);
                }
                Err(e) => {
                    warn!(frames = self.stats.frames, error = %e, "frame source failed");
                    self.close();
                    return Err(e);
                }
            }
        }
    }

    fn process(&mut self, packet: &RawPacket) {
        let (message, endpoints) = match self.decode(packet) {
            Ok(decoded) => decoded,
            Err(Error::Decode(e)) => {
                debug!(frame = packet.frame_number, reason = %e, "skipping frame");
                self.stats.record_skip(&e);
                return;
            }
            Err(e) => {
                debug!(frame = packet.frame_number, reason = %e, "malformed DNS payload");
                self.stats.malformed_dns += 1;
                return;
            }
        };

        trace!(
            frame = packet.frame_number,
            id = message.id(),
            response = message.is_response(),
            questions = message.questions.len(),
            answers = message.answers.len(),
            "decoded DNS message"
        );

        self.stats.messages += 1;
        flatten_into(&message, &endpoints, &mut self.pending);
        if self.pending.is_empty() {
            self.stats.empty_messages += 1;
        } else {
            self.stats.records += self.pending.len() as u64;
            self.pending_key = packet.key();
            self.state = ReaderState::Draining;
        }
    }

    fn decode(&self, packet: &RawPacket) -> Result<(DnsMessage, FlowEndpoints), Error> {
        let frame = decode_frame(&self.registry, packet.link_type, &packet.data)?;
        self.config.check(&frame)?;
        let message = DnsMessage::parse(frame.payload)?;
        Ok((message, frame.endpoints))
    }

    /// Release the frame source and drop any buffered rows.
    pub fn close(&mut self) {
        self.source = None;
        self.pending.clear();
        self.state = ReaderState::Exhausted;
    }
}

impl<R> DnsRecordReader<R> {
    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn stats(&self) -> &ReaderStats {
        &self.stats
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Rows buffered from the current frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<R: PacketReader> Iterator for DnsRecordReader<R> {
    type Item = Result<KeyedRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
