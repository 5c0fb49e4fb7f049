use nom::IResult;

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Significant bits per channel in the original image. The variant is
/// carried by the data length, matching the image's channel count.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum sBITChunk {
    Gray { gray: u8 },
    GrayAlpha { gray: u8, alpha: u8 },
    Rgb { red: u8, green: u8, blue: u8 },
    Rgba { red: u8, green: u8, blue: u8, alpha: u8 },
}

impl<'a> ParseableChunk<'a> for sBITChunk {
    const TYPE: &'static [u8; 4] = b"sBIT";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let chunk = match *data {
            [gray] => sBITChunk::Gray { gray },
            [gray, alpha] => sBITChunk::GrayAlpha { gray, alpha },
            [red, green, blue] => sBITChunk::Rgb { red, green, blue },
            [red, green, blue, alpha] => sBITChunk::Rgba {
                red,
                green,
                blue,
                alpha,
            },
            _ => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    data,
                    nom::error::ErrorKind::Verify,
                )))
            }
        };
        Ok((&data[data.len()..], chunk))
    }

    fn payload(&self) -> Vec<u8> {
        match *self {
            sBITChunk::Gray { gray } => vec![gray],
            sBITChunk::GrayAlpha { gray, alpha } => vec![gray, alpha],
            sBITChunk::Rgb { red, green, blue } => vec![red, green, blue],
            sBITChunk::Rgba {
                red,
                green,
                blue,
                alpha,
            } => vec![red, green, blue, alpha],
        }
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    sBITChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::sBIT(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*sBITChunk::TYPE))
}
