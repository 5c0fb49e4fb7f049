use thiserror::Error;

pub(crate) fn chunk_name(ty: &[u8; 4]) -> String {
    String::from_utf8_lossy(ty).into_owned()
}

/// A recoverable oddity noticed while decoding, tagged with the byte offset
/// in the input where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte {offset})")]
pub struct Warning {
    pub kind: WarningKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    #[error("chunk CRC mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch { stored: u32, computed: u32 },
    #[error("duplicate {} chunk ignored", chunk_name(.0))]
    Duplicate([u8; 4]),
    #[error("{} chunk appears after {}", chunk_name(.0), chunk_name(.1))]
    OutOfOrder([u8; 4], [u8; 4]),
    #[error("{} chunk is not allowed for color type {}", chunk_name(.0), .1)]
    Forbidden([u8; 4], u8),
    #[error("IEND chunk carries {0} bytes of data")]
    NonEmptyIend(usize),
    #[error("{} chunk after IEND ignored", chunk_name(.0))]
    AfterIend([u8; 4]),
    #[error("missing IEND chunk")]
    MissingIend,
    #[error("{} chunk is {actual} bytes, expected {expected}", chunk_name(.ty))]
    OversizedChunk {
        ty: [u8; 4],
        expected: usize,
        actual: usize,
    },
    #[error("chunk length {0} exceeds the 2^31-1 limit")]
    OversizedLength(u32),
    #[error("could not parse {} chunk", chunk_name(.0))]
    AncillaryParse([u8; 4]),
    #[error("unknown compression method {method} in {} chunk", chunk_name(.ty))]
    UnknownCompression { ty: [u8; 4], method: u8 },
    #[error("hIST has {hist} entries but the palette has {palette}")]
    HistogramLength { hist: usize, palette: usize },
}

/// Why a decode halted. [`DecodeError`] pairs this with the input offset and
/// the warnings collected before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("not a PNG: missing the 8-byte signature")]
    Signature,
    #[error("unexpected end of input")]
    Truncated,
    #[error("first chunk is not IHDR")]
    MissingHeader,
    #[error("no IDAT chunk present")]
    MissingImageData,
    #[error("IHDR is malformed")]
    IllegalHeader,
    #[error("image dimensions {width}x{height} are invalid")]
    IllegalDimensions { width: u32, height: u32 },
    #[error("bit depth {bit_depth} is not legal for color type {color_type}")]
    IllegalDepth { color_type: u8, bit_depth: u8 },
    #[error("unknown compression method {0} in IHDR")]
    CompressionMethod(u8),
    #[error("unknown filter method {0} in IHDR")]
    FilterMethod(u8),
    #[error("unknown interlace method {0} in IHDR")]
    InterlaceMethod(u8),
    #[error("PLTE length {0} is not a multiple of 3 in 3..=768")]
    IllegalPaletteLength(usize),
    #[error("indexed-color image has no PLTE chunk")]
    MissingPalette,
    #[error("palette index {index} is outside the {len}-entry palette")]
    PaletteIndexOutOfRange { index: u8, len: usize },
    #[error("IDAT chunks are not consecutive")]
    SplitImageData,
    #[error("zlib inflate failed: {0}")]
    Inflate(String),
    #[error("inflated image data is {actual} bytes, expected {expected}")]
    TruncatedImageData { expected: usize, actual: usize },
    #[error("inflated image data exceeds the expected {expected} bytes")]
    ExcessImageData { expected: usize },
    #[error("invalid scanline filter type {0}")]
    InvalidFilter(u8),
    #[error("unrecognized critical chunk {}", chunk_name(.0))]
    UnknownCritical([u8; 4]),
    #[error("image is too large to decode")]
    OversizedImage,
    #[error("strict mode: {0}")]
    Strict(WarningKind),
}

/// A failed decode: what went wrong, where in the input it was detected, and
/// every warning that had been collected up to that point.
#[derive(Debug, Error)]
#[error("{kind} (at byte {offset})")]
pub struct DecodeError {
    pub kind: ErrorKind,
    pub offset: usize,
    pub warnings: Vec<Warning>,
}

impl DecodeError {
    pub(crate) fn at(kind: ErrorKind, offset: usize) -> Self {
        DecodeError {
            kind,
            offset,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.warnings = warnings;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("bit depth {bit_depth} is not legal for color type {color_type}")]
    IllegalDepth { color_type: u8, bit_depth: u8 },
    #[error("image dimensions {width}x{height} are invalid")]
    IllegalDimensions { width: u32, height: u32 },
    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("more than {limit} distinct colors do not fit a palette at bit depth {bit_depth}")]
    PaletteOverflow { limit: usize, bit_depth: u8 },
}
