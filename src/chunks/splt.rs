use nom::{
    bytes::complete::{tag, take_till},
    combinator::all_consuming,
    multi::many0,
    number::complete::{be_u16, u8 as any_u8},
    sequence::tuple,
    IResult,
};

use super::text::{from_latin1, to_latin1};
use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedColor {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
    pub frequency: u16,
}

/// A suggested palette with RGBA samples at 8- or 16-bit depth.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct sPLTChunk {
    pub name: String,
    pub sample_depth: u8,
    pub entries: Vec<SuggestedColor>,
}

fn entry8(data: &[u8]) -> IResult<&[u8], SuggestedColor> {
    let (rest, (red, green, blue, alpha, frequency)) =
        tuple((any_u8, any_u8, any_u8, any_u8, be_u16))(data)?;
    Ok((
        rest,
        SuggestedColor {
            red: red as u16,
            green: green as u16,
            blue: blue as u16,
            alpha: alpha as u16,
            frequency,
        },
    ))
}

fn entry16(data: &[u8]) -> IResult<&[u8], SuggestedColor> {
    let (rest, (red, green, blue, alpha, frequency)) =
        tuple((be_u16, be_u16, be_u16, be_u16, be_u16))(data)?;
    Ok((
        rest,
        SuggestedColor {
            red,
            green,
            blue,
            alpha,
            frequency,
        },
    ))
}

impl<'a> ParseableChunk<'a> for sPLTChunk {
    const TYPE: &'static [u8; 4] = b"sPLT";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (name, _, sample_depth)) =
            tuple((take_till(|b| b == 0), tag(&[0u8][..]), any_u8))(data)?;
        let (rest, entries) = match sample_depth {
            8 => all_consuming(many0(entry8))(rest)?,
            16 => all_consuming(many0(entry16))(rest)?,
            _ => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    data,
                    nom::error::ErrorKind::Verify,
                )))
            }
        };
        Ok((
            rest,
            sPLTChunk {
                name: from_latin1(name),
                sample_depth,
                entries,
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = to_latin1(&self.name);
        data.push(0);
        data.push(self.sample_depth);
        for entry in &self.entries {
            if self.sample_depth == 8 {
                data.extend([
                    entry.red as u8,
                    entry.green as u8,
                    entry.blue as u8,
                    entry.alpha as u8,
                ]);
            } else {
                data.extend(entry.red.to_be_bytes());
                data.extend(entry.green.to_be_bytes());
                data.extend(entry.blue.to_be_bytes());
                data.extend(entry.alpha.to_be_bytes());
            }
            data.extend(entry.frequency.to_be_bytes());
        }
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    sPLTChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::sPLT(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*sPLTChunk::TYPE))
}
