use nom::{
    combinator::all_consuming,
    number::complete::{be_u16, u8 as any_u8},
    sequence::tuple,
    IResult,
};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Image last-modification time, UTC.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct tIMEChunk {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl<'a> ParseableChunk<'a> for tIMEChunk {
    const TYPE: &'static [u8; 4] = b"tIME";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (year, month, day, hour, minute, second)) =
            tuple((be_u16, any_u8, any_u8, any_u8, any_u8, any_u8))(data)?;
        Ok((
            rest,
            tIMEChunk {
                year,
                month,
                day,
                hour,
                minute,
                second,
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(7);
        data.extend(self.year.to_be_bytes());
        data.extend([self.month, self.day, self.hour, self.minute, self.second]);
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    all_consuming(tIMEChunk::from_bytes)(data)
        .map(|(_, chunk)| Metadata::tIME(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*tIMEChunk::TYPE))
}
