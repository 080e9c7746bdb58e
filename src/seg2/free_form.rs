use super::read_bytes;
use crate::error::Error;
use byteorder::ByteOrder;
use std::io::{Read, Seek};

/// One `KEYWORD value...` entry of a free-form string block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub key: String,
    pub value: String,
}

/// Reads length-prefixed strings until the zero length terminator.
///
/// Each string is stored as a signed 2-byte length that counts the length
/// field itself, followed by the text. Trailing NULs and any of the `terminators`
/// bytes are stripped, the first whitespace-separated token becomes the key and the
/// remaining tokens, joined by single spaces, the value.
pub(crate) fn read_entries<B: ByteOrder, R: Read + Seek>(
    r: &mut R,
    terminators: &[u8],
) -> Result<Vec<Entry>, Error> {
    let mut entries = Vec::new();
    loop {
        let offset = r.stream_position()?;
        let len = B::read_i16(&read_bytes(r, 2)?);
        if len == 0 {
            break;
        }
        if len < 2 {
            return Err(Error::Format {
                offset,
                reason: format!("free-form string length {len} is shorter than its own prefix"),
            });
        }
        let raw = read_bytes(r, len as usize - 2)?;
        if let Some(entry) = parse_entry(&raw, terminators) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn parse_entry(raw: &[u8], terminators: &[u8]) -> Option<Entry> {
    let end = raw
        .iter()
        .rposition(|b| *b != 0 && !terminators.contains(b))
        .map_or(0, |i| i + 1);
    // Latin-1, every byte maps to the char of the same value
    let text: String = raw[..end].iter().map(|b| char::from(*b)).collect();
    let mut tokens = text.split_whitespace();
    let key = tokens.next()?.to_owned();
    let value = tokens.collect::<Vec<_>>().join(" ");
    Some(Entry { key, value })
}
