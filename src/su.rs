//! SU (CWP) trace files.
//!
//! An SU file is a plain sequence of records, each a 240 byte trace header
//! immediately followed by `ns` samples, all in the byte order of the machine
//! that wrote it. There is no file header, trace boundaries come from walking
//! the `ns` field of every header.

use crate::error::Error;
use crate::header::{TraceHeader, HEADER_LEN};
use crate::samples::{ElementType, SampleMatrix};
use crate::stream::Stream;
use crate::types::{Endianness, SourceFormat};
use byteorder::NativeEndian;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Writes every trace of `stream` to `path`, replacing any existing file.
pub fn write<P: AsRef<Path>>(stream: &Stream, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    write_to(stream, &mut w)?;
    w.flush()?;
    debug!(
        traces = stream.ntraces(),
        "Wrote SU file '{}'",
        path.display()
    );
    Ok(())
}

pub fn write_to<W: Write>(stream: &Stream, w: &mut W) -> Result<(), Error> {
    let samples = stream.samples();
    if samples.ntraces() != stream.ntraces() {
        return Err(Error::TraceCountMismatch {
            rows: samples.ntraces(),
            headers: stream.ntraces(),
        });
    }
    for (i, h) in stream.headers().iter().enumerate() {
        h.write_to::<NativeEndian, W>(w)?;
        samples.write_row::<NativeEndian, W>(i, w)?;
    }
    Ok(())
}

/// Reads an SU file holding samples of type `element`.
pub fn read<P: AsRef<Path>>(path: P, element: ElementType) -> Result<Stream, Error> {
    let path = path.as_ref();
    let mut stream = read_from(BufReader::new(File::open(path)?), element)?;
    stream.provenance.origin = Some(path.to_path_buf());
    stream.log(format_args!("suread: origin {}", path.display()));
    Ok(stream)
}

/// Reads SU records until the end of `r`. Every record must hold the same
/// number of samples, a partial trailing record is an error.
pub fn read_from<R: Read>(mut r: R, element: ElementType) -> Result<Stream, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    let mut headers = Vec::new();
    let mut payloads = Vec::new();
    let mut nsamples = None;
    let mut offset = 0;
    while offset < buf.len() {
        let record = &buf[offset..];
        if record.len() < HEADER_LEN {
            return Err(Error::Truncated {
                offset: offset as u64,
                expected: HEADER_LEN,
                actual: record.len(),
            });
        }
        let h = TraceHeader::read_from::<NativeEndian, _>(&mut &record[..HEADER_LEN])?;
        let ns = usize::from(h.ns);
        let expected = *nsamples.get_or_insert(ns);
        if expected != ns {
            return Err(Error::Format {
                offset: offset as u64,
                reason: format!(
                    "trace {} holds {ns} samples, earlier traces hold {expected}",
                    headers.len()
                ),
            });
        }
        let payload = &record[HEADER_LEN..];
        let len = ns * element.width();
        if payload.len() < len {
            return Err(Error::Truncated {
                offset: (offset + HEADER_LEN) as u64,
                expected: len,
                actual: payload.len(),
            });
        }
        payloads.push(&payload[..len]);
        headers.push(h);
        offset += HEADER_LEN + len;
    }

    let ntraces = headers.len();
    let ns = nsamples.unwrap_or_default();
    let mut samples = SampleMatrix::zeros(element, ntraces, ns);
    for (i, payload) in payloads.into_iter().enumerate() {
        samples.fill_row::<NativeEndian>(i, element, payload)?;
    }

    let mut stream = Stream::new();
    stream.trace_descriptors = vec![Default::default(); ntraces];
    stream.headers = headers;
    stream.samples = samples;
    stream.provenance.format = SourceFormat::Su;
    stream.provenance.endianness = Some(Endianness::native());
    stream.log(format_args!(
        "suread: {ntraces} traces, {ns} samples of {element}"
    ));
    Ok(stream)
}
