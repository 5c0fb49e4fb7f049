use nom::IResult;

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Intended background color. The variant is carried by the data length:
/// one byte for a palette index, two for a gray level, six for RGB.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum bKGDChunk {
    Index { index: u8 },
    Gray { gray: u16 },
    Rgb { red: u16, green: u16, blue: u16 },
}

impl<'a> ParseableChunk<'a> for bKGDChunk {
    const TYPE: &'static [u8; 4] = b"bKGD";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let chunk = match *data {
            [index] => bKGDChunk::Index { index },
            [g0, g1] => bKGDChunk::Gray {
                gray: u16::from_be_bytes([g0, g1]),
            },
            [r0, r1, g0, g1, b0, b1] => bKGDChunk::Rgb {
                red: u16::from_be_bytes([r0, r1]),
                green: u16::from_be_bytes([g0, g1]),
                blue: u16::from_be_bytes([b0, b1]),
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
            bKGDChunk::Index { index } => vec![index],
            bKGDChunk::Gray { gray } => gray.to_be_bytes().to_vec(),
            bKGDChunk::Rgb { red, green, blue } => {
                let mut data = Vec::with_capacity(6);
                data.extend(red.to_be_bytes());
                data.extend(green.to_be_bytes());
                data.extend(blue.to_be_bytes());
                data
            }
        }
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    bKGDChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::bKGD(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*bKGDChunk::TYPE))
}
