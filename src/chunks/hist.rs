use nom::{combinator::all_consuming, multi::many0, number::complete::be_u16, IResult};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Approximate usage frequency of each palette entry.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct hISTChunk {
    pub frequencies: Vec<u16>,
}

impl<'a> ParseableChunk<'a> for hISTChunk {
    const TYPE: &'static [u8; 4] = b"hIST";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, frequencies) = many0(be_u16)(data)?;
        Ok((rest, hISTChunk { frequencies }))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.frequencies.len() * 2);
        for frequency in &self.frequencies {
            data.extend(frequency.to_be_bytes());
        }
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    all_consuming(hISTChunk::from_bytes)(data)
        .map(|(_, chunk)| Metadata::hIST(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*hISTChunk::TYPE))
}
