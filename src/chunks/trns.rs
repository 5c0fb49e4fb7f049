/// The tRNS chunk, interpreted against the image's color type: a grayscale
/// key, an RGB key triple, or per-palette-index alpha values.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct tRNSChunk<'a> {
    data: &'a [u8],
}

impl<'a> tRNSChunk<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        tRNSChunk { data }
    }

    pub(crate) fn gray_key(&self) -> Option<u16> {
        let bytes = self.data.get(0..2)?;
        Some(u16::from_be_bytes(bytes.try_into().expect("2 bytes")))
    }

    pub(crate) fn rgb_key(&self) -> Option<(u16, u16, u16)> {
        let bytes = self.data.get(0..6)?;
        Some((
            u16::from_be_bytes(bytes[0..2].try_into().expect("2 bytes")),
            u16::from_be_bytes(bytes[2..4].try_into().expect("2 bytes")),
            u16::from_be_bytes(bytes[4..6].try_into().expect("2 bytes")),
        ))
    }

    /// Alpha for a palette index; entries past the end default to opaque.
    pub(crate) fn palette_alpha(&self, index: u8) -> u8 {
        *self.data.get(index as usize).unwrap_or(&255)
    }
}
