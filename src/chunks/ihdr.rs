use super::frame_chunk;
use crate::error::ErrorKind;

/// Image header: the validated contents of the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub interlace: Interlace,
}

impl Ihdr {
    pub(crate) const DATA_LEN: usize = 13;

    /// Parses and validates the 13-byte IHDR body. Compression and filter
    /// methods other than 0 and any illegal (color type, bit depth) pair are
    /// rejected here, before anything downstream runs.
    pub(crate) fn parse(data: &[u8]) -> Result<Self, ErrorKind> {
        if data.len() < Self::DATA_LEN {
            return Err(ErrorKind::IllegalHeader);
        }
        let width = u32::from_be_bytes(data[0..4].try_into().expect("4 bytes"));
        let height = u32::from_be_bytes(data[4..8].try_into().expect("4 bytes"));
        let bit_depth = data[8];
        let color_type =
            ColorType::from_u8(data[9]).ok_or(ErrorKind::IllegalDepth {
                color_type: data[9],
                bit_depth,
            })?;
        if !color_type.legal_depth(bit_depth) {
            return Err(ErrorKind::IllegalDepth {
                color_type: data[9],
                bit_depth,
            });
        }
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(ErrorKind::IllegalDimensions { width, height });
        }
        if data[10] != 0 {
            return Err(ErrorKind::CompressionMethod(data[10]));
        }
        if data[11] != 0 {
            return Err(ErrorKind::FilterMethod(data[11]));
        }
        let interlace = match data[12] {
            0 => Interlace::None,
            1 => Interlace::Adam7,
            other => return Err(ErrorKind::InterlaceMethod(other)),
        };
        Ok(Ihdr {
            width,
            height,
            bit_depth,
            color_type,
            interlace,
        })
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::DATA_LEN);
        data.extend(self.width.to_be_bytes());
        data.extend(self.height.to_be_bytes());
        data.extend([
            self.bit_depth,
            self.color_type as u8,
            0,
            0,
            self.interlace as u8,
        ]);
        frame_chunk(b"IHDR", &data)
    }

    /// Bits per pixel in the native layout.
    pub(crate) fn pixel_bits(&self) -> usize {
        self.color_type.channels() as usize * self.bit_depth as usize
    }

    /// The byte stride used by filter predictors: whole bytes per pixel,
    /// rounded up to at least one.
    pub(crate) fn filter_width(&self) -> usize {
        let sample_bytes = usize::max(self.bit_depth as usize / 8, 1);
        self.color_type.channels() as usize * sample_bytes
    }

    /// Bytes in one scanline of `width` pixels, including the filter byte.
    pub(crate) fn scanline_size(&self, width: usize) -> usize {
        (width * self.pixel_bits()).div_ceil(8) + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ColorType {
    Grayscale = 0,
    Rgb = 2,
    Indexed = 3,
    GrayscaleAlpha = 4,
    #[default]
    Rgba = 6,
}

impl ColorType {
    pub(crate) fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Grayscale),
            2 => Some(Self::Rgb),
            3 => Some(Self::Indexed),
            4 => Some(Self::GrayscaleAlpha),
            6 => Some(Self::Rgba),
            _ => None,
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            Self::Grayscale | Self::Indexed => 1,
            Self::GrayscaleAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn legal_depth(self, bit_depth: u8) -> bool {
        match self {
            Self::Grayscale => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
            Self::Indexed => matches!(bit_depth, 1 | 2 | 4 | 8),
            Self::Rgb | Self::GrayscaleAlpha | Self::Rgba => matches!(bit_depth, 8 | 16),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Interlace {
    #[default]
    None = 0,
    Adam7 = 1,
}
