use super::read_bytes;
use crate::error::Error;
use crate::types::Endianness;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::io::{Read, Seek};

/// Size of the fixed part of the file descriptor block
pub(crate) const FILE_DESCRIPTOR_LEN: usize = 32;

/// Block identifier, stored in the file's byte order
pub(crate) const FILE_BLOCK_ID: u16 = 0x3A55;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FileHeader {
    pub endianness: Endianness,
    pub revision: u16,
    pub pointer_block_size: u16,
    pub ntraces: u16,
    pub string_terminator: Vec<u8>,
    pub line_terminator: Vec<u8>,
}

impl FileHeader {
    pub fn read<R: Read + Seek>(r: &mut R) -> Result<Self, Error> {
        let buf = read_bytes(r, FILE_DESCRIPTOR_LEN)?;
        let endianness = if LittleEndian::read_u16(&buf[0..2]) == FILE_BLOCK_ID {
            Endianness::Little
        } else if BigEndian::read_u16(&buf[0..2]) == FILE_BLOCK_ID {
            Endianness::Big
        } else {
            return Err(Error::Format {
                offset: 0,
                reason: format!(
                    "unrecognized block identifier 0x{:02X}{:02X}",
                    buf[0], buf[1]
                ),
            });
        };
        Ok(match endianness {
            Endianness::Little => Self::parse::<LittleEndian>(&buf, endianness),
            Endianness::Big => Self::parse::<BigEndian>(&buf, endianness),
        })
    }

    fn parse<B: ByteOrder>(buf: &[u8], endianness: Endianness) -> Self {
        let terminator = |len: u8, at: usize| buf[at..at + usize::from(len.min(2))].to_vec();
        Self {
            endianness,
            revision: B::read_u16(&buf[2..4]),
            pointer_block_size: B::read_u16(&buf[4..6]),
            ntraces: B::read_u16(&buf[6..8]),
            string_terminator: terminator(buf[8], 9),
            line_terminator: terminator(buf[11], 12),
        }
    }

    /// Absolute offsets of every trace descriptor block, in table order.
    pub fn read_trace_pointers<B: ByteOrder, R: Read + Seek>(
        &self,
        r: &mut R,
    ) -> Result<Vec<u32>, Error> {
        let offset = r.stream_position()?;
        let size = usize::from(self.pointer_block_size);
        let needed = usize::from(self.ntraces) * 4;
        if size < needed {
            return Err(Error::Format {
                offset,
                reason: format!(
                    "trace pointer sub-block of {size} bytes cannot hold {} pointers",
                    self.ntraces
                ),
            });
        }
        let buf = read_bytes(r, size)?;
        Ok(buf[..needed].chunks_exact(4).map(B::read_u32).collect())
    }
}
