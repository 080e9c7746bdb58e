//! SEG-2 decoder.
//!
//! A SEG-2 file starts with a 32 byte file descriptor block whose first two
//! bytes identify the byte order, followed by a table of trace pointers and a
//! block of free-form `KEYWORD value` strings. Every trace pointer leads to a
//! trace descriptor block (32 bytes plus its own free-form strings) directly
//! followed by the samples.

use crate::config::ReadOptions;
use crate::descriptor::Descriptor;
use crate::error::{DecodeWarning, Error};
use crate::samples::{ElementType, SampleMatrix};
use crate::stream::Stream;
use crate::types::{Endianness, SampleFormat, SourceFormat};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use file::FileHeader;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use trace::TraceBlock;
use tracing::{debug, warn};

mod file;
mod free_form;
mod trace;

#[cfg(test)]
pub(crate) mod fixture;

/// Decodes the SEG-2 file at `path`.
///
/// A path that does not exist is not an error, it yields `Ok(None)` after
/// logging a warning.
pub fn read<P: AsRef<Path>>(path: P, opts: &ReadOptions) -> Result<Option<Stream>, Error> {
    let path = path.as_ref();
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("SEG-2 file '{}' does not exist", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let mut stream = read_from(BufReader::new(f), opts)?;
    stream.provenance.origin = Some(path.to_path_buf());
    stream.log(format_args!("seg2read: origin {}", path.display()));
    Ok(Some(stream))
}

/// Decodes a SEG-2 byte stream.
pub fn read_from<R: Read + Seek>(mut r: R, opts: &ReadOptions) -> Result<Stream, Error> {
    opts.validate()?;
    let fh = FileHeader::read(&mut r)?;
    match fh.endianness {
        Endianness::Little => decode::<LittleEndian, R>(&mut r, &fh, opts),
        Endianness::Big => decode::<BigEndian, R>(&mut r, &fh, opts),
    }
}

fn decode<B: ByteOrder, R: Read + Seek>(
    r: &mut R,
    fh: &FileHeader,
    opts: &ReadOptions,
) -> Result<Stream, Error> {
    debug!(
        revision = fh.revision,
        traces = fh.ntraces,
        "Decoding {} SEG-2 stream",
        fh.endianness
    );
    let stream_len = stream_len(r)?;
    let pointers = fh.read_trace_pointers::<B, R>(r)?;
    let terminators = [fh.string_terminator.as_slice(), &fh.line_terminator].concat();

    let mut file_descriptor = Descriptor::file_defaults();
    for e in free_form::read_entries::<B, R>(r, &terminators)? {
        file_descriptor.insert_raw(e.key, &e.value);
    }

    let mut stream = Stream::new();
    let ntraces = pointers.len();
    let mut samples: Option<SampleMatrix> = None;
    let mut headers = Vec::with_capacity(ntraces);
    let mut trace_descriptors = Vec::with_capacity(ntraces);
    let mut warnings = Vec::new();
    let mut interval = None;

    for (index, pointer) in pointers.into_iter().enumerate() {
        let offset = u64::from(pointer);
        r.seek(SeekFrom::Start(offset))?;
        let block = TraceBlock::read::<B, R>(r)?;
        if block.block_id != trace::TRACE_BLOCK_ID {
            warnings.push(DecodeWarning::UnexpectedTraceBlockId {
                trace: index,
                found: block.block_id,
            });
        }
        let format =
            SampleFormat::from_code(block.format_code).ok_or(Error::UnknownSampleFormat {
                trace: index,
                code: block.format_code,
            })?;

        let entries = free_form::read_entries::<B, R>(r, &terminators)?;
        let states_interval = entries.iter().any(|e| e.key == "SAMPLE_INTERVAL");
        let descriptor = trace::trace_descriptor(entries, offset)?;
        if states_interval {
            interval = descriptor.number("SAMPLE_INTERVAL");
        }

        if block.nsamples > u32::from(u16::MAX) {
            return Err(Error::Format {
                offset,
                reason: format!(
                    "trace {index} claims {} samples, an SU header holds at most {}",
                    block.nsamples,
                    u16::MAX
                ),
            });
        }
        let nsamples = block.nsamples as usize;
        let smallest = ntraces as u64 * nsamples as u64 * MIN_BYTES_PER_SAMPLE;
        if samples.is_none() && smallest > stream_len {
            return Err(Error::Format {
                offset,
                reason: format!(
                    "{ntraces} traces of {nsamples} samples cannot fit in {stream_len} bytes"
                ),
            });
        }
        let matrix = samples.get_or_insert_with(|| {
            let element = format.element().unwrap_or(ElementType::F32);
            SampleMatrix::zeros(element, ntraces, nsamples)
        });
        if matrix.nsamples() != nsamples {
            return Err(Error::Format {
                offset,
                reason: format!(
                    "trace {index} holds {nsamples} samples, earlier traces hold {}",
                    matrix.nsamples()
                ),
            });
        }

        r.seek(SeekFrom::Start(offset + u64::from(block.block_size)))?;
        let payload_len = format.payload_len(nsamples);
        if block.data_size as usize != payload_len {
            debug!(
                trace = index,
                data_size = block.data_size,
                payload_len,
                "Trace data size disagrees with its sample count"
            );
        }
        let payload = read_bytes(r, payload_len)?;
        match format.element() {
            Some(element) => {
                if element != matrix.element() {
                    warnings.push(DecodeWarning::SampleFormatMismatch {
                        trace: index,
                        code: block.format_code,
                        container: SampleFormat::from(matrix.element()).code(),
                    });
                }
                matrix.fill_row::<B>(index, element, &payload)?;
            }
            None => warnings.push(DecodeWarning::UnsupportedEncoding {
                trace: index,
                code: block.format_code,
            }),
        }

        headers.push(trace::synthesize_header(
            index,
            nsamples,
            interval,
            &descriptor,
            &file_descriptor,
            opts,
            &mut stream.units,
        )?);
        trace_descriptors.push(descriptor);
    }

    for w in warnings.iter() {
        warn!("{w}");
    }

    stream.headers = headers;
    stream.samples = samples.unwrap_or_default();
    stream.trace_descriptors = trace_descriptors;
    stream.file_descriptor = file_descriptor;
    stream.warnings = warnings;
    stream.provenance.format = SourceFormat::Seg2;
    stream.provenance.revision = fh.revision;
    stream.provenance.endianness = Some(fh.endianness);
    stream.log(format_args!(
        "seg2read: {ntraces} traces, {} samples, {}, revision {}",
        stream.samples.nsamples(),
        fh.endianness,
        fh.revision
    ));
    Ok(stream)
}

/// The narrowest sample encoding, 16-bit integers
const MIN_BYTES_PER_SAMPLE: u64 = 2;

/// Upper bound on what [`read_bytes`] reserves before any byte arrived
const READ_RESERVE: usize = 64 * 1024;

fn stream_len<R: Seek>(r: &mut R) -> io::Result<u64> {
    let pos = r.stream_position()?;
    let end = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(end)
}

/// Reads exactly `len` bytes, a short read is a truncation error at the
/// offset the read started from.
///
/// The buffer grows with the bytes actually read, a length claimed by the
/// file never sizes an allocation on its own.
pub(crate) fn read_bytes<R: Read + Seek>(r: &mut R, len: usize) -> Result<Vec<u8>, Error> {
    let offset = r.stream_position()?;
    let mut buf = Vec::with_capacity(len.min(READ_RESERVE));
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(Error::Truncated {
            offset,
            expected: len,
            actual: buf.len(),
        });
    }
    Ok(buf)
}
