//! Builder for DNS payloads used in tests.

/// Encode a dotted name without compression. `"."` and `""` are the root.
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// RDATA encoders.
pub mod rdata {
    use super::encode_name;

    pub fn a(octets: [u8; 4]) -> Vec<u8> {
        octets.to_vec()
    }

    pub fn aaaa(addr: &str) -> Vec<u8> {
        addr.parse::<std::net::Ipv6Addr>()
            .expect("valid IPv6 literal")
            .octets()
            .to_vec()
    }

    pub fn name(target: &str) -> Vec<u8> {
        encode_name(target)
    }

    pub fn mx(preference: u16, exchange: &str) -> Vec<u8> {
        let mut out = preference.to_be_bytes().to_vec();
        out.extend(encode_name(exchange));
        out
    }

    pub fn srv(priority: u16, weight: u16, port: u16, target: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&priority.to_be_bytes());
        out.extend_from_slice(&weight.to_be_bytes());
        out.extend_from_slice(&port.to_be_bytes());
        out.extend(encode_name(target));
        out
    }

    pub fn afsdb(subtype: u16, hostname: &str) -> Vec<u8> {
        let mut out = subtype.to_be_bytes().to_vec();
        out.extend(encode_name(hostname));
        out
    }

    pub fn txt(strings: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        for s in strings {
            out.push(s.len() as u8);
            out.extend_from_slice(s.as_bytes());
        }
        out
    }
}

/// Builder for DNS messages.
#[derive(Debug, Clone)]
pub struct DnsMessageBuilder {
    id: u16,
    flags: u16,
    questions: Vec<Vec<u8>>,
    answers: Vec<Vec<u8>>,
    authority: Vec<Vec<u8>>,
    additional: Vec<Vec<u8>>,
}

impl DnsMessageBuilder {
    fn new(id: u16, flags: u16) -> Self {
        Self {
            id,
            flags,
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Standard query with RD set.
    pub fn query(id: u16) -> Self {
        Self::new(id, 0x0100)
    }

    /// Standard response with RD and RA set.
    pub fn response(id: u16) -> Self {
        Self::new(id, 0x8180)
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn question(mut self, name: &str, rtype: u16, rclass: u16) -> Self {
        let mut entry = encode_name(name);
        entry.extend_from_slice(&rtype.to_be_bytes());
        entry.extend_from_slice(&rclass.to_be_bytes());
        self.questions.push(entry);
        self
    }

    pub fn answer(mut self, name: &str, rtype: u16, rclass: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.answers.push(record(encode_name(name), rtype, rclass, ttl, rdata));
        self
    }

    /// Answer whose owner is a pointer to the first question's name.
    pub fn compressed_answer(mut self, rtype: u16, rclass: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.answers.push(record(vec![0xc0, 0x0c], rtype, rclass, ttl, rdata));
        self
    }

    pub fn authority(mut self, name: &str, rtype: u16, rclass: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.authority.push(record(encode_name(name), rtype, rclass, ttl, rdata));
        self
    }

    pub fn additional(mut self, name: &str, rtype: u16, rclass: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.additional.push(record(encode_name(name), rtype, rclass, ttl, rdata));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(512);
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        for section in [&self.questions, &self.answers, &self.authority, &self.additional] {
            out.extend_from_slice(&(section.len() as u16).to_be_bytes());
        }
        for section in [self.questions, self.answers, self.authority, self.additional] {
            for entry in section {
                out.extend(entry);
            }
        }
        out
    }
}

fn record(owner: Vec<u8>, rtype: u16, rclass: u16, ttl: u32, rdata: Vec<u8>) -> Vec<u8> {
    let mut out = owner;
    out.extend_from_slice(&rtype.to_be_bytes());
    out.extend_from_slice(&rclass.to_be_bytes());
    out.extend_from_slice(&ttl.to_be_bytes());
    out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    out.extend(rdata);
    out
}
