use nom::{combinator::all_consuming, number::complete::be_u32, IResult};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Image gamma, stored as 100000 times the exponent.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct gAMAChunk {
    pub gamma: u32,
}

impl<'a> ParseableChunk<'a> for gAMAChunk {
    const TYPE: &'static [u8; 4] = b"gAMA";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, gamma) = be_u32(data)?;
        Ok((rest, gAMAChunk { gamma }))
    }

    fn payload(&self) -> Vec<u8> {
        self.gamma.to_be_bytes().to_vec()
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    all_consuming(gAMAChunk::from_bytes)(data)
        .map(|(_, chunk)| Metadata::gAMA(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*gAMAChunk::TYPE))
}
