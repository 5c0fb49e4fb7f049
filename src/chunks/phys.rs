use nom::{
    combinator::all_consuming,
    number::complete::{be_u32, u8 as any_u8},
    sequence::tuple,
    IResult,
};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Unknown,
    Meter,
}

/// Intended physical pixel size or aspect ratio.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct pHYsChunk {
    pub x_axis_ppu: u32,
    pub y_axis_ppu: u32,
    pub unit: Unit,
}

impl<'a> ParseableChunk<'a> for pHYsChunk {
    const TYPE: &'static [u8; 4] = b"pHYs";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (x_axis_ppu, y_axis_ppu, unit)) = tuple((be_u32, be_u32, any_u8))(data)?;
        let unit = match unit {
            1 => Unit::Meter,
            _ => Unit::Unknown,
        };
        Ok((
            rest,
            pHYsChunk {
                x_axis_ppu,
                y_axis_ppu,
                unit,
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(9);
        data.extend(self.x_axis_ppu.to_be_bytes());
        data.extend(self.y_axis_ppu.to_be_bytes());
        data.push(match self.unit {
            Unit::Unknown => 0,
            Unit::Meter => 1,
        });
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    all_consuming(pHYsChunk::from_bytes)(data)
        .map(|(_, chunk)| Metadata::pHYs(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*pHYsChunk::TYPE))
}
