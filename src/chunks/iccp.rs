use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::decompress_to_vec_zlib;
use nom::{
    bytes::complete::{tag, take_till},
    number::complete::u8 as any_u8,
    sequence::tuple,
    IResult,
};

use super::text::{from_latin1, to_latin1};
use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// An embedded ICC profile: a Latin-1 name and the inflated profile bytes.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct iCCPChunk {
    pub name: String,
    pub profile: Vec<u8>,
}

fn header(data: &[u8]) -> IResult<&[u8], (&[u8], u8)> {
    let (rest, (name, _, method)) =
        tuple((take_till(|b| b == 0), tag(&[0u8][..]), any_u8))(data)?;
    Ok((rest, (name, method)))
}

impl<'a> ParseableChunk<'a> for iCCPChunk {
    const TYPE: &'static [u8; 4] = b"iCCP";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (compressed, (name, _)) = header(data)?;
        let profile = decompress_to_vec_zlib(compressed).map_err(|_| {
            nom::Err::Error(nom::error::Error::new(data, nom::error::ErrorKind::Verify))
        })?;
        Ok((
            &data[data.len()..],
            iCCPChunk {
                name: from_latin1(name),
                profile,
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = to_latin1(&self.name);
        data.push(0);
        data.push(0);
        data.extend(compress_to_vec_zlib(&self.profile, 9));
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    if let Ok((_, (_, method))) = header(data) {
        if method != 0 {
            return Err(WarningKind::UnknownCompression {
                ty: *iCCPChunk::TYPE,
                method,
            });
        }
    }
    iCCPChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::iCCP(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*iCCPChunk::TYPE))
}
