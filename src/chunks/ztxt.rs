use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::decompress_to_vec_zlib;
use nom::{
    bytes::complete::{tag, take_till},
    number::complete::u8 as any_u8,
    IResult,
};

use super::text::{from_latin1, to_latin1};
use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Compressed textual data: a Latin-1 keyword and a zlib-deflated value.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct zTXtChunk {
    pub keyword: String,
    pub text: String,
}

impl zTXtChunk {
    fn header(data: &[u8]) -> IResult<&[u8], (&[u8], u8)> {
        let (rest, keyword) = take_till(|b| b == 0)(data)?;
        let (rest, _) = tag(&[0u8][..])(rest)?;
        let (rest, method) = any_u8(rest)?;
        Ok((rest, (keyword, method)))
    }
}

impl<'a> ParseableChunk<'a> for zTXtChunk {
    const TYPE: &'static [u8; 4] = b"zTXt";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (compressed, (keyword, _)) = Self::header(data)?;
        let text = decompress_to_vec_zlib(compressed).map_err(|_| {
            nom::Err::Error(nom::error::Error::new(data, nom::error::ErrorKind::Verify))
        })?;
        Ok((
            &data[data.len()..],
            zTXtChunk {
                keyword: from_latin1(keyword),
                text: from_latin1(&text),
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = to_latin1(&self.keyword);
        data.push(0);
        data.push(0);
        data.extend(compress_to_vec_zlib(&to_latin1(&self.text), 9));
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    if let Ok((_, (_, method))) = zTXtChunk::header(data) {
        if method != 0 {
            return Err(WarningKind::UnknownCompression {
                ty: *zTXtChunk::TYPE,
                method,
            });
        }
    }
    zTXtChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::zTXt(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*zTXtChunk::TYPE))
}
