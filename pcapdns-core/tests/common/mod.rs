//! Synthetic frames and capture files for pipeline tests.

#![allow(dead_code)]

use std::io::Write;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

pub const TYPE_A: u16 = 1;
pub const TYPE_MX: u16 = 15;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_AAAA: u16 = 28;
pub const CLASS_IN: u16 = 1;

pub const LINKTYPE_ETHERNET: u16 = 1;
pub const LINKTYPE_RAW: u16 = 101;
pub const LINKTYPE_LINUX_SLL: u16 = 113;

/// Encode a dotted name as DNS labels.
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// Minimal DNS message writer.
pub struct DnsBuilder {
    id: u16,
    flags: u16,
    questions: Vec<Vec<u8>>,
    answers: Vec<Vec<u8>>,
}

impl DnsBuilder {
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: 0x0100,
            questions: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn response(id: u16) -> Self {
        Self {
            flags: 0x8180,
            ..Self::query(id)
        }
    }

    pub fn question(mut self, name: &str, rtype: u16) -> Self {
        let mut q = encode_name(name);
        q.extend_from_slice(&rtype.to_be_bytes());
        q.extend_from_slice(&CLASS_IN.to_be_bytes());
        self.questions.push(q);
        self
    }

    /// Answer whose owner is a pointer to the first question name.
    pub fn answer(mut self, rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        let mut rr = vec![0xc0, 0x0c];
        rr.extend_from_slice(&rtype.to_be_bytes());
        rr.extend_from_slice(&CLASS_IN.to_be_bytes());
        rr.extend_from_slice(&ttl.to_be_bytes());
        rr.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        rr.extend_from_slice(rdata);
        self.answers.push(rr);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.extend_from_slice(&(self.questions.len() as u16).to_be_bytes());
        out.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 0]);
        for q in self.questions {
            out.extend_from_slice(&q);
        }
        for a in self.answers {
            out.extend_from_slice(&a);
        }
        out
    }
}

pub fn udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(&src_port.to_be_bytes());
    out.extend_from_slice(&dst_port.to_be_bytes());
    out.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(payload);
    out
}

/// IPv4 header (DF set) around `payload`.
pub fn ipv4(src: Ipv4Addr, dst: Ipv4Addr, protocol: u8, payload: &[u8]) -> Vec<u8> {
    ipv4_with_flags(src, dst, protocol, 0x4000, payload)
}

pub fn ipv4_with_flags(src: Ipv4Addr, dst: Ipv4Addr, protocol: u8, flags_fragment: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(20 + payload.len());
    out.push(0x45);
    out.push(0);
    out.extend_from_slice(&((20 + payload.len()) as u16).to_be_bytes());
    out.extend_from_slice(&[0x12, 0x34]);
    out.extend_from_slice(&flags_fragment.to_be_bytes());
    out.push(64);
    out.push(protocol);
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&src.octets());
    out.extend_from_slice(&dst.octets());
    out.extend_from_slice(payload);
    out
}

pub fn ipv6(src: Ipv6Addr, dst: Ipv6Addr, next_header: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(40 + payload.len());
    out.extend_from_slice(&0x6000_0000u32.to_be_bytes());
    out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    out.push(next_header);
    out.push(64);
    out.extend_from_slice(&src.octets());
    out.extend_from_slice(&dst.octets());
    out.extend_from_slice(payload);
    out
}

pub fn ethernet(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(14 + payload.len());
    out.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    out.extend_from_slice(&[0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);
    out.extend_from_slice(&ethertype.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn linux_sll(protocol: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + payload.len());
    out.extend_from_slice(&0u16.to_be_bytes()); // packet type: to us
    out.extend_from_slice(&1u16.to_be_bytes()); // ARPHRD_ETHER
    out.extend_from_slice(&6u16.to_be_bytes());
    out.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0, 0]);
    out.extend_from_slice(&protocol.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Ethernet/IPv4/UDP frame carrying `dns`.
pub fn dns_over_ipv4(src: Ipv4Addr, dst: Ipv4Addr, src_port: u16, dst_port: u16, dns: &[u8]) -> Vec<u8> {
    ethernet(0x0800, &ipv4(src, dst, 17, &udp(src_port, dst_port, dns)))
}

pub fn dns_over_ipv6(src: Ipv6Addr, dst: Ipv6Addr, src_port: u16, dst_port: u16, dns: &[u8]) -> Vec<u8> {
    ethernet(0x86DD, &ipv6(src, dst, 17, &udp(src_port, dst_port, dns)))
}

/// One frame queued for a capture file.
pub struct Frame {
    pub ts_sec: u32,
    pub ts_usec: u32,
    pub data: Vec<u8>,
}

/// Writes legacy PCAP or PCAPNG files into a temporary directory.
pub struct PcapFileBuilder {
    link_type: u16,
    frames: Vec<Frame>,
}

impl PcapFileBuilder {
    pub fn new(link_type: u16) -> Self {
        Self {
            link_type,
            frames: Vec::new(),
        }
    }

    pub fn frame(mut self, ts_sec: u32, ts_usec: u32, data: Vec<u8>) -> Self {
        self.frames.push(Frame { ts_sec, ts_usec, data });
        self
    }

    /// Little-endian, microsecond legacy PCAP.
    pub fn pcap_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&65535u32.to_le_bytes());
        out.extend_from_slice(&u32::from(self.link_type).to_le_bytes());
        for frame in &self.frames {
            out.extend_from_slice(&frame.ts_sec.to_le_bytes());
            out.extend_from_slice(&frame.ts_usec.to_le_bytes());
            out.extend_from_slice(&(frame.data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(frame.data.len() as u32).to_le_bytes());
            out.extend_from_slice(&frame.data);
        }
        out
    }

    /// Little-endian PCAPNG with one microsecond interface.
    pub fn pcapng_bytes(&self) -> Vec<u8> {
        let mut builder = PcapNgBuilder::new().interface(self.link_type, None);
        for frame in &self.frames {
            let ticks = u64::from(frame.ts_sec) * 1_000_000 + u64::from(frame.ts_usec);
            builder = builder.packet(0, ticks, frame.data.clone());
        }
        builder.bytes()
    }

    pub fn write_pcap(&self, dir: &TempDir, name: &str) -> PathBuf {
        write_file(dir, name, &self.pcap_bytes())
    }

    pub fn write_pcapng(&self, dir: &TempDir, name: &str) -> PathBuf {
        write_file(dir, name, &self.pcapng_bytes())
    }

    pub fn write_pcap_gz(&self, dir: &TempDir, name: &str) -> PathBuf {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.pcap_bytes()).unwrap();
        write_file(dir, name, &encoder.finish().unwrap())
    }
}

/// Block-level PCAPNG writer for multi-interface captures.
#[derive(Default)]
pub struct PcapNgBuilder {
    blocks: Vec<u8>,
}

impl PcapNgBuilder {
    /// Start a capture with its section header.
    pub fn new() -> Self {
        Self::default().section()
    }

    /// Start a new section; interface ids restart at 0.
    pub fn section(mut self) -> Self {
        let mut body = Vec::new();
        body.extend_from_slice(&0x1A2B_3C4Du32.to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&(-1i64).to_le_bytes());
        self.block(0x0A0D_0D0A, &body);
        self
    }

    /// Declare an interface, optionally with an `if_tsresol` option.
    pub fn interface(mut self, link_type: u16, tsresol: Option<u8>) -> Self {
        let mut body = Vec::new();
        body.extend_from_slice(&link_type.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&65535u32.to_le_bytes());
        if let Some(resol) = tsresol {
            body.extend_from_slice(&9u16.to_le_bytes());
            body.extend_from_slice(&1u16.to_le_bytes());
            body.extend_from_slice(&[resol, 0, 0, 0]);
            body.extend_from_slice(&[0; 4]);
        }
        self.block(1, &body);
        self
    }

    /// Enhanced packet block with a raw timestamp in interface units.
    pub fn packet(mut self, if_id: u32, ticks: u64, data: Vec<u8>) -> Self {
        let mut body = Vec::new();
        body.extend_from_slice(&if_id.to_le_bytes());
        body.extend_from_slice(&((ticks >> 32) as u32).to_le_bytes());
        body.extend_from_slice(&(ticks as u32).to_le_bytes());
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(&data);
        self.block(6, &body);
        self
    }

    pub fn bytes(self) -> Vec<u8> {
        self.blocks
    }

    pub fn write(self, dir: &TempDir, name: &str) -> PathBuf {
        write_file(dir, name, &self.blocks)
    }

    fn block(&mut self, block_type: u32, body: &[u8]) {
        let padded = body.len().div_ceil(4) * 4;
        let total = (12 + padded) as u32;
        self.blocks.extend_from_slice(&block_type.to_le_bytes());
        self.blocks.extend_from_slice(&total.to_le_bytes());
        self.blocks.extend_from_slice(body);
        self.blocks.resize(self.blocks.len() + padded - body.len(), 0);
        self.blocks.extend_from_slice(&total.to_le_bytes());
    }
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
