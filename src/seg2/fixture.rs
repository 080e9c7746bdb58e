//! Synthetic SEG-2 byte streams for tests.

use super::file::{FILE_BLOCK_ID, FILE_DESCRIPTOR_LEN};
use super::trace::{TRACE_BLOCK_ID, TRACE_DESCRIPTOR_LEN};
use crate::types::Endianness;
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

#[derive(Clone, Debug)]
pub(crate) struct TraceSpec {
    pub code: u8,
    pub samples: Vec<f64>,
    pub strings: Vec<String>,
    pub block_id: u16,
    /// Sample count written to the descriptor block instead of `samples.len()`
    pub claimed_nsamples: Option<u32>,
}

impl TraceSpec {
    pub fn new(code: u8, samples: Vec<f64>) -> Self {
        Self {
            code,
            samples,
            strings: Vec::new(),
            block_id: TRACE_BLOCK_ID,
            claimed_nsamples: None,
        }
    }

    pub fn string(mut self, s: &str) -> Self {
        self.strings.push(s.to_owned());
        self
    }

    fn payload<B: ByteOrder>(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for s in self.samples.iter().copied() {
            match self.code {
                1 => out.write_i16::<B>(s as i16),
                2 => out.write_i32::<B>(s as i32),
                4 => out.write_f32::<B>(s as f32),
                5 => out.write_f64::<B>(s),
                _ => Ok(()),
            }
            .unwrap();
        }
        if self.code == 3 {
            out.resize((self.samples.len() * 5 + 1) / 2, 0xA5);
        }
        out
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Seg2Builder {
    endianness: Endianness,
    revision: u16,
    strings: Vec<String>,
    traces: Vec<TraceSpec>,
    pointer_table: Option<Vec<usize>>,
}

impl Seg2Builder {
    pub fn new(endianness: Endianness) -> Self {
        Self {
            endianness,
            revision: 1,
            strings: Vec::new(),
            traces: Vec::new(),
            pointer_table: None,
        }
    }

    /// Lists the traces in the pointer table by their position in the file,
    /// e.g. `[2, 1, 0]` makes the table run backwards. Entries may repeat.
    pub fn pointer_table(mut self, order: Vec<usize>) -> Self {
        self.pointer_table = Some(order);
        self
    }

    pub fn revision(mut self, revision: u16) -> Self {
        self.revision = revision;
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        self.strings.push(s.to_owned());
        self
    }

    pub fn trace(mut self, trace: TraceSpec) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        match self.endianness {
            Endianness::Little => self.build_as::<LittleEndian>(),
            Endianness::Big => self.build_as::<BigEndian>(),
        }
    }

    fn build_as<B: ByteOrder>(&self) -> Vec<u8> {
        let order = self
            .pointer_table
            .clone()
            .unwrap_or_else(|| (0..self.traces.len()).collect());
        let ntraces = order.len();
        let mut out = Vec::new();
        out.write_u16::<B>(FILE_BLOCK_ID).unwrap();
        out.write_u16::<B>(self.revision).unwrap();
        out.write_u16::<B>((ntraces * 4) as u16).unwrap();
        out.write_u16::<B>(ntraces as u16).unwrap();
        // NUL string terminator, CR LF line terminator
        out.extend_from_slice(&[1, 0, 0, 2, b'\r', b'\n']);
        out.resize(FILE_DESCRIPTOR_LEN, 0);

        let table_at = out.len();
        out.resize(table_at + ntraces * 4, 0);
        out.extend(strings::<B>(&self.strings));

        let mut pointers = Vec::with_capacity(self.traces.len());
        for t in self.traces.iter() {
            pointers.push(out.len() as u32);
            let strings = strings::<B>(&t.strings);
            let payload = t.payload::<B>();
            out.write_u16::<B>(t.block_id).unwrap();
            out.write_u16::<B>((TRACE_DESCRIPTOR_LEN + strings.len()) as u16)
                .unwrap();
            out.write_u32::<B>(payload.len() as u32).unwrap();
            out.write_u32::<B>(t.claimed_nsamples.unwrap_or(t.samples.len() as u32))
                .unwrap();
            out.push(t.code);
            out.resize(out.len() + TRACE_DESCRIPTOR_LEN - 13, 0);
            out.extend(strings);
            out.extend(payload);
        }
        for (i, trace) in order.into_iter().enumerate() {
            let at = table_at + i * 4;
            B::write_u32(&mut out[at..at + 4], pointers[trace]);
        }
        out
    }
}

fn strings<B: ByteOrder>(strings: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for s in strings {
        out.write_u16::<B>((s.len() + 3) as u16).unwrap();
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }
    out.write_u16::<B>(0).unwrap();
    out
}
