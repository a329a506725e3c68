//! Domain name decoding.
//!
//! Names are read from the whole message so compression pointers can be
//! followed. Every pointer must jump strictly backwards, and each jump must
//! land before the previous one, which bounds the walk without a hop counter.

use crate::error::DnsError;

/// Maximum encoded name length, length octets and root label included.
pub const MAX_NAME_LEN: usize = 255;

const POINTER_MASK: u8 = 0xC0;

/// Read the name starting at `start`.
///
/// Returns the name rendered in presentation form and the offset just past
/// the name's encoding at `start` (past the first pointer, if any).
pub fn read_name(msg: &[u8], start: usize) -> Result<(String, usize), DnsError> {
    let mut name = String::new();
    let mut pos = start;
    let mut resume = None;
    let mut limit = usize::MAX;
    let mut wire_len = 0;

    loop {
        let len_byte = *msg.get(pos).ok_or(DnsError::UnexpectedEnd { offset: pos })?;

        match len_byte & POINTER_MASK {
            0x00 => {
                let len = len_byte as usize;
                wire_len += len + 1;
                if wire_len > MAX_NAME_LEN {
                    return Err(DnsError::NameTooLong { offset: start });
                }

                if len == 0 {
                    if name.is_empty() {
                        name.push('.');
                    }
                    return Ok((name, resume.unwrap_or(pos + 1)));
                }

                let label = msg
                    .get(pos + 1..pos + 1 + len)
                    .ok_or(DnsError::UnexpectedEnd { offset: msg.len() })?;
                push_label(&mut name, label);
                name.push('.');
                pos += 1 + len;
            }
            POINTER_MASK => {
                let low = *msg.get(pos + 1).ok_or(DnsError::UnexpectedEnd { offset: pos + 1 })?;
                let target = (((len_byte & !POINTER_MASK) as usize) << 8) | low as usize;
                if target >= pos.min(limit) {
                    return Err(DnsError::BadPointer { offset: pos, target });
                }
                resume.get_or_insert(pos + 2);
                limit = target;
                pos = target;
            }
            _ => {
                return Err(DnsError::BadLabelType {
                    offset: pos,
                    byte: len_byte,
                })
            }
        }
    }
}

/// Append one label in presentation form.
fn push_label(out: &mut String, label: &[u8]) {
    for &b in label {
        match b {
            b'"' | b'(' | b')' | b'.' | b';' | b'\\' | b'@' | b'$' => {
                out.push('\\');
                out.push(b as char);
            }
            0x21..=0x7e => out.push(b as char),
            _ => push_decimal_escape(out, b),
        }
    }
}

/// Render a character-string (TXT) in presentation form, without quotes.
pub fn character_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            _ => push_decimal_escape(&mut out, b),
        }
    }
    out
}

fn push_decimal_escape(out: &mut String, b: u8) {
    out.push('\\');
    out.push(char::from(b'0' + b / 100));
    out.push(char::from(b'0' + (b / 10) % 10));
    out.push(char::from(b'0' + b % 10));
}
