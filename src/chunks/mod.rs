use nom::{
    bytes::complete::{tag, take},
    number::complete::be_u32,
    IResult,
};

use crate::crc::crc32;
use crate::error::{DecodeError, ErrorKind};

pub mod bkgd;
pub mod chrm;
pub mod exif;
pub mod gama;
pub mod hist;
pub mod iccp;
pub(crate) mod idat;
pub(crate) mod iend;
pub mod ihdr;
pub mod itxt;
pub mod phys;
pub mod plte;
pub mod sbit;
pub mod splt;
pub mod srgb;
pub mod text;
pub mod time;
pub(crate) mod trns;
pub mod ztxt;

/// The fixed 8-byte prefix of every PNG file.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub(crate) fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&SIGNATURE[..])(input)
}

/// One framed chunk, borrowed from the input. The CRC has been recomputed
/// and compared but a mismatch is recorded, not enforced.
#[derive(Debug, Clone, Copy)]
pub struct RawChunk<'a> {
    /// Byte offset of the chunk's length field in the input.
    pub offset: usize,
    pub ty: [u8; 4],
    pub data: &'a [u8],
    /// The CRC stored in the file.
    pub crc: u32,
    /// Recomputed CRC over type and data.
    pub computed_crc: u32,
}

impl RawChunk<'_> {
    pub fn crc_ok(&self) -> bool {
        self.crc == self.computed_crc
    }

    pub fn is_ancillary(&self) -> bool {
        self.ty[0] & 0x20 != 0
    }

    pub fn is_private(&self) -> bool {
        self.ty[1] & 0x20 != 0
    }

    pub fn is_reserved_valid(&self) -> bool {
        self.ty[2] & 0x20 == 0
    }

    pub fn is_safe_to_copy(&self) -> bool {
        self.ty[3] & 0x20 != 0
    }
}

/// Owned framing record surfaced in decode results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub offset: usize,
    pub ty: [u8; 4],
    pub data_len: usize,
    pub crc: u32,
    pub crc_ok: bool,
}

impl From<&RawChunk<'_>> for ChunkInfo {
    fn from(chunk: &RawChunk<'_>) -> Self {
        ChunkInfo {
            offset: chunk.offset,
            ty: chunk.ty,
            data_len: chunk.data.len(),
            crc: chunk.crc,
            crc_ok: chunk.crc_ok(),
        }
    }
}

/// Splits the input into chunks after checking the signature. Fails on a
/// missing signature or when any chunk field runs past end-of-input.
pub(crate) fn split_chunks(input: &[u8]) -> Result<Vec<RawChunk<'_>>, DecodeError> {
    let total = input.len();
    let mut rest = match parse_signature(input) {
        Ok((rest, _)) => rest,
        Err(_) => return Err(DecodeError::at(ErrorKind::Signature, 0)),
    };
    let mut chunks = Vec::new();
    while !rest.is_empty() {
        let offset = total - rest.len();
        let (after, chunk) =
            frame_chunk_at(rest, offset).map_err(|_| DecodeError::at(ErrorKind::Truncated, offset))?;
        rest = after;
        chunks.push(chunk);
    }
    Ok(chunks)
}

fn frame_chunk_at(input: &[u8], offset: usize) -> IResult<&[u8], RawChunk<'_>> {
    let (input, length) = be_u32(input)?;
    let (input, ty) = take(4usize)(input)?;
    let (input, data) = take(length)(input)?;
    let (input, crc) = be_u32(input)?;
    let ty: [u8; 4] = ty.try_into().expect("4 bytes were taken");
    let computed_crc = crc32(ty.iter().copied().chain(data.iter().copied()));
    Ok((
        input,
        RawChunk {
            offset,
            ty,
            data,
            crc,
            computed_crc,
        },
    ))
}

/// Frames `data` as a chunk of type `ty`: length, type, data, CRC.
pub(crate) fn frame_chunk(ty: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend((data.len() as u32).to_be_bytes());
    out.extend(ty);
    out.extend(data);
    out.extend(crc32(ty.iter().copied().chain(data.iter().copied())).to_be_bytes());
    out
}

pub(crate) trait ParseableChunk<'a>: Sized {
    const TYPE: &'static [u8; 4];

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self>;
    fn payload(&self) -> Vec<u8>;

    fn to_bytes(&self) -> Vec<u8> {
        frame_chunk(Self::TYPE, &self.payload())
    }
}
