use nom::IResult;

use super::ParseableChunk;
use crate::error::WarningKind;
use crate::metadata::Metadata;

/// A raw EXIF blob. The TIFF structure inside is preserved, not interpreted.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct eXIfChunk {
    pub data: Vec<u8>,
}

impl<'a> ParseableChunk<'a> for eXIfChunk {
    const TYPE: &'static [u8; 4] = b"eXIf";

    fn from_bytes(data: &'a [u8]) -> IResult<&'a [u8], Self> {
        Ok((&data[data.len()..], eXIfChunk { data: data.to_vec() }))
    }

    fn payload(&self) -> Vec<u8> {
        self.data.clone()
    }
}

pub(crate) fn decode(data: &[u8]) -> Result<Metadata, WarningKind> {
    eXIfChunk::from_bytes(data)
        .map(|(_, chunk)| Metadata::eXIf(chunk))
        .map_err(|_| WarningKind::AncillaryParse(*eXIfChunk::TYPE))
}
