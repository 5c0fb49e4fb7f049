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

/// International textual data: UTF-8 text with a language tag and a
/// translated keyword, optionally zlib-compressed.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct iTXtChunk {
    pub keyword: String,
    pub compressed: bool,
    pub language: String,
    pub translated_keyword: String,
    pub text: String,
}

struct Header<'a> {
    keyword: &'a [u8],
    flag: u8,
    method: u8,
    language: &'a [u8],
    translated: &'a [u8],
}

fn header(data: &[u8]) -> IResult<&[u8], Header<'_>> {
    let nul = tag(&[0u8][..]);
    let (rest, (keyword, _, flag, method)) =
        tuple((take_till(|b| b == 0), &nul, any_u8, any_u8))(data)?;
    let (rest, (language, _, translated, _)) =
        tuple((take_till(|b| b == 0), &nul, take_till(|b| b == 0), &nul))(rest)?;
    Ok((
        rest,
        Header {
            keyword,
            flag,
            method,
            language,
            translated,
        },
    ))
}

impl<'a> ParseableChunk<'a> for iTXtChunk {
    const TYPE: &'static [u8; 4] = b"iTXt";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, header) = header(data)?;
        let text = if header.flag != 0 {
            let inflated = decompress_to_vec_zlib(rest).map_err(|_| {
                nom::Err::Error(nom::error::Error::new(data, nom::error::ErrorKind::Verify))
            })?;
            String::from_utf8_lossy(&inflated).into_owned()
        } else {
            String::from_utf8_lossy(rest).into_owned()
        };
        Ok((
            &data[data.len()..],
            iTXtChunk {
                keyword: from_latin1(header.keyword),
                compressed: header.flag != 0,
                language: from_latin1(header.language),
                translated_keyword: String::from_utf8_lossy(header.translated).into_owned(),
                text,
            },
        ))
    }

    fn payload(&self) -> Vec<u8> {
        let mut data = to_latin1(&self.keyword);
        data.push(0);
        data.push(self.compressed as u8);
        data.push(0);
        data.extend(to_latin1(&self.language));
        data.push(0);
        data.extend(self.translated_keyword.as_bytes());
        data.push(0);
        if self.compressed {
            data.extend(compress_to_vec_zlib(self.text.as_bytes(), 9));
        } else {
            data.extend(self.text.as_bytes());
        }
        data
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    if let Ok((_, header)) = header(data) {
        if header.flag != 0 && header.method != 0 {
            return Err(WarningKind::UnknownCompression {
                ty: *iTXtChunk::TYPE,
                method: header.method,
            });
        }
    }
    iTXtChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::iTXt(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*iTXtChunk::TYPE))
}
