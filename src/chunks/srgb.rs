use nom::{
    combinator::{all_consuming, map_opt},
    number::complete::u8 as any_u8,
    IResult,
};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderingIntent {
    Perceptual = 0,
    RelativeColorimetric = 1,
    Saturation = 2,
    AbsoluteColorimetric = 3,
}

impl RenderingIntent {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Perceptual),
            1 => Some(Self::RelativeColorimetric),
            2 => Some(Self::Saturation),
            3 => Some(Self::AbsoluteColorimetric),
            _ => None,
        }
    }
}

/// Declares that the image samples conform to the sRGB color space.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct sRGBChunk {
    pub intent: RenderingIntent,
}

impl<'a> ParseableChunk<'a> for sRGBChunk {
    const TYPE: &'static [u8; 4] = b"sRGB";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, intent) = map_opt(any_u8, RenderingIntent::from_u8)(data)?;
        Ok((rest, sRGBChunk { intent }))
    }

    fn payload(&self) -> Vec<u8> {
        vec![self.intent as u8]
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    all_consuming(sRGBChunk::from_bytes)(data)
        .map(|(_, chunk)| Metadata::sRGB(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*sRGBChunk::TYPE))
}
