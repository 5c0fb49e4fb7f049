use nom::{bytes::complete::take, combinator::map, multi::count, IResult};

use super::frame_chunk;
use crate::error::ErrorKind;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The PLTE chunk: an ordered list of up to 256 RGB triplets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Rgb>,
}

impl Palette {
    pub(crate) fn parse(data: &[u8]) -> Result<Self, ErrorKind> {
        if data.is_empty() || data.len() % 3 != 0 || data.len() > 256 * 3 {
            return Err(ErrorKind::IllegalPaletteLength(data.len()));
        }
        let (_, entries) = parse_entries(data, data.len() / 3)
            .map_err(|_| ErrorKind::IllegalPaletteLength(data.len()))?;
        Ok(Palette { entries })
    }

    pub(crate) fn from_entries(entries: Vec<Rgb>) -> Self {
        Palette { entries }
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, index: u8) -> Option<Rgb> {
        self.entries.get(index as usize).copied()
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.entries.len() * 3);
        for Rgb(r, g, b) in &self.entries {
            data.extend([*r, *g, *b]);
        }
        frame_chunk(b"PLTE", &data)
    }
}

fn parse_entries(data: &[u8], entry_count: usize) -> IResult<&[u8], Vec<Rgb>> {
    count(map(take(3usize), |t: &[u8]| Rgb(t[0], t[1], t[2])), entry_count)(data)
}
