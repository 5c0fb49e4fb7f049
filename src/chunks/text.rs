use nom::{
    bytes::complete::{tag, take_till},
    IResult,
};

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// Uncompressed textual data: a Latin-1 keyword and value.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct tEXtChunk {
    pub keyword: String,
    pub text: String,
}

impl<'a> ParseableChunk<'a> for tEXtChunk {
    const TYPE: &'static [u8; 4] = b"tEXt";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, keyword) = take_till(|b| b == 0)(data)?;
        let (text, _) = tag(&[0u8][..])(rest)?;
        Ok((
            &data[data.len()..],
            tEXtChunk {
                keyword: from_latin1(keyword),
                text: from_latin1(text),
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = to_latin1(&self.keyword);
        data.push(0);
        data.extend(to_latin1(&self.text));
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    tEXtChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::tEXt(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*tEXtChunk::TYPE))
}

/// Latin-1 maps byte-for-byte onto the first 256 code points.
pub(crate) fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub(crate) fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}
