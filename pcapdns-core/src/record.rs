//! Flattening DNS messages into fixed nine-column rows.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::dns::{DnsMessage, RecordData, ResourceRecord};
use crate::protocol::{ipv6_text, FlowEndpoints};
use crate::schema::{DataKind, FieldDescriptor, FieldValue};

/// Whether a row came from a query or a response (the header's QR bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Question,
    Response,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Question => "question",
            Mode::Response => "response",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One question or answer entry, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub transaction_id: u16,
    pub mode: Mode,
    pub qname: String,
    pub answer_data: Option<String>,
    pub ttl: u32,
    pub src_ip: String,
    pub dst_ip: String,
    pub record_class: u16,
    pub record_type: u16,
}

/// A row paired with the capture second of the frame it came from.
pub type KeyedRecord = (i64, OutputRecord);

impl OutputRecord {
    /// Number of columns in a row.
    pub const FIELD_COUNT: usize = 9;

    /// Column descriptors, in row order.
    pub fn schema() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("transaction_id", DataKind::UInt16)
                .with_description("DNS message ID"),
            FieldDescriptor::new("mode", DataKind::String)
                .with_description("\"question\" for queries, \"response\" for responses"),
            FieldDescriptor::new("qname", DataKind::String)
                .with_description("Owner name of the entry"),
            FieldDescriptor::nullable("answer_data", DataKind::String)
                .with_description("Rendered answer; NULL for questions and unrendered types"),
            FieldDescriptor::new("ttl", DataKind::UInt32).with_description("0 for questions"),
            FieldDescriptor::new("src_ip", DataKind::String),
            FieldDescriptor::new("dst_ip", DataKind::String),
            FieldDescriptor::new("record_class", DataKind::UInt16),
            FieldDescriptor::new("record_type", DataKind::UInt16),
        ]
    }

    /// Cell values, in the same order as [`OutputRecord::schema`].
    pub fn values(&self) -> [FieldValue<'_>; Self::FIELD_COUNT] {
        [
            FieldValue::UInt16(self.transaction_id),
            FieldValue::Str(self.mode.as_str()),
            FieldValue::Str(&self.qname),
            FieldValue::from(self.answer_data.as_deref()),
            FieldValue::UInt32(self.ttl),
            FieldValue::Str(&self.src_ip),
            FieldValue::Str(&self.dst_ip),
            FieldValue::UInt16(self.record_class),
            FieldValue::UInt16(self.record_type),
        ]
    }
}

/// Render the answer column for an answer entry.
///
/// AFSDB rows carry the owner name rather than the AFS server hostname.
pub fn answer_data(record: &ResourceRecord) -> Option<String> {
    match &record.data {
        RecordData::A(addr) => Some(addr.to_string()),
        RecordData::Aaaa(addr) => Some(match addr.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => ipv6_text(addr),
        }),
        RecordData::Mx { exchange, .. } => Some(exchange.clone()),
        RecordData::Ptr(target) => Some(target.clone()),
        RecordData::Txt(strings) => Some(format!("[{}]", strings.join(", "))),
        RecordData::Srv { target, .. } => Some(target.clone()),
        RecordData::Afsdb { .. } => Some(record.name.clone()),
        _ => None,
    }
}

/// Flatten a message: every question, then every answer.
pub fn flatten(message: &DnsMessage, endpoints: &FlowEndpoints) -> Vec<OutputRecord> {
    let mut rows = VecDeque::with_capacity(message.record_count());
    flatten_into(message, endpoints, &mut rows);
    rows.into()
}

/// Append the flattened rows of `message` to `out`.
pub fn flatten_into(message: &DnsMessage, endpoints: &FlowEndpoints, out: &mut VecDeque<OutputRecord>) {
    let mode = if message.is_response() {
        Mode::Response
    } else {
        Mode::Question
    };
    let src_ip = endpoints.src_text();
    let dst_ip = endpoints.dst_text();

    let row = |entry: &ResourceRecord, answer_data: Option<String>, ttl: u32| OutputRecord {
        transaction_id: message.id(),
        mode,
        qname: entry.name.clone(),
        answer_data,
        ttl,
        src_ip: src_ip.clone(),
        dst_ip: dst_ip.clone(),
        record_class: entry.rclass,
        record_type: entry.rtype,
    };

    out.extend(message.questions.iter().map(|q| row(q, None, 0)));
    out.extend(message.answers.iter().map(|a| row(a, answer_data(a), a.ttl)));
}
