//! Typed RDATA.

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Bytes;

use super::name::{character_string, read_name};
use super::record_type;
use crate::error::DnsError;

/// Decoded record data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    /// Question entries carry no data.
    None,
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(String),
    Cname(String),
    Soa {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Ptr(String),
    Mx {
        preference: u16,
        exchange: String,
    },
    Txt(Vec<String>),
    Afsdb {
        subtype: u16,
        hostname: String,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    /// Any type without a dedicated decoder, kept verbatim.
    Other(Bytes),
}

/// Bounded reader over one record's RDATA. Names may point anywhere
/// earlier in the message but their inline bytes must end within RDATA.
struct RdataReader<'a> {
    msg: &'a [u8],
    pos: usize,
    end: usize,
    rtype: u16,
}

impl<'a> RdataReader<'a> {
    fn bad(&self, reason: &'static str) -> DnsError {
        DnsError::BadRdata {
            rtype: self.rtype,
            reason,
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DnsError> {
        if self.end - self.pos < len {
            return Err(self.bad("field runs past rdata"));
        }
        let bytes = &self.msg[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn u16(&mut self) -> Result<u16, DnsError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, DnsError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn name(&mut self) -> Result<String, DnsError> {
        // Confine inline labels to RDATA; pointers still see the message prefix.
        let (name, next) = read_name(&self.msg[..self.end], self.pos).map_err(|e| match e {
            DnsError::UnexpectedEnd { .. } => self.bad("name runs past rdata"),
            other => other,
        })?;
        self.pos = next;
        Ok(name)
    }

    fn finish(self, data: RecordData) -> Result<RecordData, DnsError> {
        if self.pos != self.end {
            return Err(self.bad("trailing bytes"));
        }
        Ok(data)
    }
}

/// Decode the RDATA of a record of type `rtype` occupying `msg[start..end]`.
pub(crate) fn decode(msg: &[u8], rtype: u16, start: usize, end: usize) -> Result<RecordData, DnsError> {
    let mut r = RdataReader {
        msg,
        pos: start,
        end,
        rtype,
    };

    let data = match rtype {
        record_type::A => {
            let b = r.take(4)?;
            RecordData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
        }
        record_type::AAAA => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(r.take(16)?);
            RecordData::Aaaa(Ipv6Addr::from(octets))
        }
        record_type::NS => RecordData::Ns(r.name()?),
        record_type::CNAME => RecordData::Cname(r.name()?),
        record_type::PTR => RecordData::Ptr(r.name()?),
        record_type::MX => RecordData::Mx {
            preference: r.u16()?,
            exchange: r.name()?,
        },
        record_type::AFSDB => RecordData::Afsdb {
            subtype: r.u16()?,
            hostname: r.name()?,
        },
        record_type::SRV => RecordData::Srv {
            priority: r.u16()?,
            weight: r.u16()?,
            port: r.u16()?,
            target: r.name()?,
        },
        record_type::SOA => RecordData::Soa {
            mname: r.name()?,
            rname: r.name()?,
            serial: r.u32()?,
            refresh: r.u32()?,
            retry: r.u32()?,
            expire: r.u32()?,
            minimum: r.u32()?,
        },
        record_type::TXT => {
            let mut strings = Vec::new();
            while r.pos < r.end {
                let len = r.take(1)?[0] as usize;
                strings.push(character_string(r.take(len)?));
            }
            RecordData::Txt(strings)
        }
        _ => RecordData::Other(Bytes::copy_from_slice(r.take(end - start)?)),
    };

    r.finish(data)
}
