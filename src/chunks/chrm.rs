use nom::{combinator::all_consuming, number::complete::be_u32, sequence::tuple, IResult};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Primary chromaticities and white point, each coordinate stored as
/// 100000 times its value.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct cHRMChunk {
    pub white_x: u32,
    pub white_y: u32,
    pub red_x: u32,
    pub red_y: u32,
    pub green_x: u32,
    pub green_y: u32,
    pub blue_x: u32,
    pub blue_y: u32,
}

impl<'a> ParseableChunk<'a> for cHRMChunk {
    const TYPE: &'static [u8; 4] = b"cHRM";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (white_x, white_y, red_x, red_y, green_x, green_y, blue_x, blue_y)) =
            tuple((be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32, be_u32))(data)?;
        Ok((
            rest,
            cHRMChunk {
                white_x,
                white_y,
                red_x,
                red_y,
                green_x,
                green_y,
                blue_x,
                blue_y,
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(32);
        for value in [
            self.white_x,
            self.white_y,
            self.red_x,
            self.red_y,
            self.green_x,
            self.green_y,
            self.blue_x,
            self.blue_y,
        ] {
            data.extend(value.to_be_bytes());
        }
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    all_consuming(cHRMChunk::from_bytes)(data)
        .map(|(_, chunk)| Metadata::cHRM(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*cHRMChunk::TYPE))
}
