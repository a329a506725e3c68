//! DNS message parsing.
//!
//! [`DnsMessage::parse`] decodes the header, question and answer sections of
//! a UDP payload. Authority and additional records are walked and bounds
//! checked but not kept. Parsing is all-or-nothing: any malformed section
//! rejects the whole message.

mod name;
mod rdata;

#[cfg(test)]
pub mod builder;

pub use name::{read_name, MAX_NAME_LEN};
pub use rdata::RecordData;

use tracing::trace;

use crate::error::DnsError;

/// DNS header length.
pub const HEADER_LEN: usize = 12;

/// Smallest possible question entry: root name + type + class.
const MIN_QUESTION_LEN: usize = 5;

/// Smallest possible resource record: root name + type, class, TTL, RDLENGTH.
const MIN_RECORD_LEN: usize = 11;

/// DNS record types.
pub mod record_type {
    pub const A: u16 = 1;
    pub const NS: u16 = 2;
    pub const CNAME: u16 = 5;
    pub const SOA: u16 = 6;
    pub const PTR: u16 = 12;
    pub const MX: u16 = 15;
    pub const TXT: u16 = 16;
    pub const AFSDB: u16 = 18;
    pub const AAAA: u16 = 28;
    pub const SRV: u16 = 33;
    pub const OPT: u16 = 41;
    pub const ANY: u16 = 255;
}

/// DNS classes.
pub mod class {
    pub const IN: u16 = 1;
    pub const CH: u16 = 3;
    pub const HS: u16 = 4;
    pub const ANY: u16 = 255;
}

/// DNS response codes.
pub mod rcode {
    pub const NOERROR: u8 = 0;
    pub const FORMERR: u8 = 1;
    pub const SERVFAIL: u8 = 2;
    pub const NXDOMAIN: u8 = 3;
    pub const NOTIMP: u8 = 4;
    pub const REFUSED: u8 = 5;
}

/// Fixed 12-byte message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl DnsHeader {
    pub fn parse(data: &[u8]) -> Result<Self, DnsError> {
        let Some(h) = data.get(..HEADER_LEN) else {
            return Err(DnsError::TruncatedHeader { len: data.len() });
        };
        let word = |i: usize| u16::from_be_bytes([h[i], h[i + 1]]);
        Ok(Self {
            id: word(0),
            flags: word(2),
            qdcount: word(4),
            ancount: word(6),
            nscount: word(8),
            arcount: word(10),
        })
    }

    /// QR bit (bit 15): set on responses.
    pub fn is_response(&self) -> bool {
        self.flags & 0x8000 != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags >> 11) & 0x0F) as u8
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags & 0x0400 != 0
    }

    pub fn is_truncated(&self) -> bool {
        self.flags & 0x0200 != 0
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & 0x0100 != 0
    }

    pub fn recursion_available(&self) -> bool {
        self.flags & 0x0080 != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & 0x000F) as u8
    }
}

/// A question or answer entry. Questions have `ttl == 0` and no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rclass: u16,
    pub rtype: u16,
    pub ttl: u32,
    pub data: RecordData,
}

/// A parsed DNS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<ResourceRecord>,
    pub answers: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Parse a message from a UDP payload. Never panics.
    pub fn parse(data: &[u8]) -> Result<Self, DnsError> {
        let header = DnsHeader::parse(data)?;
        let mut pos = HEADER_LEN;

        check_count(data, pos, "question", header.qdcount, MIN_QUESTION_LEN)?;
        let mut questions = Vec::with_capacity(header.qdcount as usize);
        for _ in 0..header.qdcount {
            let (question, next) = parse_question(data, pos)?;
            questions.push(question);
            pos = next;
        }

        check_count(data, pos, "answer", header.ancount, MIN_RECORD_LEN)?;
        let mut answers = Vec::with_capacity(header.ancount as usize);
        for _ in 0..header.ancount {
            let (answer, next) = parse_record(data, pos)?;
            answers.push(answer);
            pos = next;
        }

        check_count(data, pos, "authority", header.nscount, MIN_RECORD_LEN)?;
        for _ in 0..header.nscount {
            pos = skip_record(data, pos)?;
        }

        check_count(data, pos, "additional", header.arcount, MIN_RECORD_LEN)?;
        for _ in 0..header.arcount {
            pos = skip_record(data, pos)?;
        }

        trace!(
            id = header.id,
            questions = questions.len(),
            answers = answers.len(),
            trailing = data.len() - pos,
            "parsed DNS message"
        );

        Ok(Self {
            header,
            questions,
            answers,
        })
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    /// Number of question and answer entries.
    pub fn record_count(&self) -> usize {
        self.questions.len() + self.answers.len()
    }
}

fn check_count(
    data: &[u8],
    pos: usize,
    section: &'static str,
    count: u16,
    min_len: usize,
) -> Result<(), DnsError> {
    let remaining = data.len() - pos;
    if count as usize * min_len > remaining {
        return Err(DnsError::CountExceedsData {
            section,
            count,
            remaining,
        });
    }
    Ok(())
}

fn read_u16(data: &[u8], pos: usize) -> Result<u16, DnsError> {
    data.get(pos..pos + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or(DnsError::UnexpectedEnd { offset: pos })
}

fn read_u32(data: &[u8], pos: usize) -> Result<u32, DnsError> {
    data.get(pos..pos + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(DnsError::UnexpectedEnd { offset: pos })
}

fn parse_question(data: &[u8], pos: usize) -> Result<(ResourceRecord, usize), DnsError> {
    let (name, pos) = read_name(data, pos)?;
    let rtype = read_u16(data, pos)?;
    let rclass = read_u16(data, pos + 2)?;
    Ok((
        ResourceRecord {
            name,
            rclass,
            rtype,
            ttl: 0,
            data: RecordData::None,
        },
        pos + 4,
    ))
}

/// Fixed part of a resource record after the owner name.
struct RecordHeader {
    rtype: u16,
    rclass: u16,
    ttl: u32,
    rdata_start: usize,
    rdata_end: usize,
}

fn parse_record_header(data: &[u8], pos: usize) -> Result<RecordHeader, DnsError> {
    let rtype = read_u16(data, pos)?;
    let rclass = read_u16(data, pos + 2)?;
    let ttl = read_u32(data, pos + 4)?;
    let rdlength = read_u16(data, pos + 8)? as usize;
    let rdata_start = pos + 10;
    let rdata_end = rdata_start + rdlength;
    if rdata_end > data.len() {
        return Err(DnsError::UnexpectedEnd { offset: data.len() });
    }
    Ok(RecordHeader {
        rtype,
        rclass,
        ttl,
        rdata_start,
        rdata_end,
    })
}

fn parse_record(data: &[u8], pos: usize) -> Result<(ResourceRecord, usize), DnsError> {
    let (name, pos) = read_name(data, pos)?;
    let header = parse_record_header(data, pos)?;
    let rdata = rdata::decode(data, header.rtype, header.rdata_start, header.rdata_end)?;
    Ok((
        ResourceRecord {
            name,
            rclass: header.rclass,
            rtype: header.rtype,
            ttl: header.ttl,
            data: rdata,
        },
        header.rdata_end,
    ))
}

fn skip_record(data: &[u8], pos: usize) -> Result<usize, DnsError> {
    let (_, pos) = read_name(data, pos)?;
    Ok(parse_record_header(data, pos)?.rdata_end)
}
