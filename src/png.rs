use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::chunks::ihdr::{ColorType, Ihdr, Interlace};
use crate::chunks::plte::{Palette, Rgb};
use crate::chunks::trns::tRNSChunk;
use crate::chunks::{frame_chunk, idat, iend, split_chunks, ChunkInfo, SIGNATURE};
use crate::error::{DecodeError, EncodeError, ErrorKind, Warning, WarningKind};
use crate::image_data;
use crate::metadata::{self, Metadata};
use crate::pixel::{self, Pixel};

/// Which ancillary chunk types get parsed into [`Metadata`] records.
#[derive(Debug, Clone, Default)]
pub enum ChunkFilter {
    /// Parse every known ancillary type.
    #[default]
    All,
    /// Parse only the listed types.
    Only(Vec<[u8; 4]>),
}

impl ChunkFilter {
    fn enabled(&self, ty: &[u8; 4]) -> bool {
        match self {
            ChunkFilter::All => true,
            ChunkFilter::Only(types) => types.contains(ty),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Promote every warning to a fatal error at the moment it is emitted.
    pub strict: bool,
    /// Reduce 16-bit images to 8 bits per channel.
    pub force_rgba8: bool,
    pub chunk_filter: ChunkFilter,
}

/// Native format of the decoded file, as declared by its IHDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDetails {
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub interlace: Interlace,
}

/// A decoded pixel buffer: always RGBA, 8 or 16 bits per channel. The
/// 16-bit form appears only for source bit depth 16 without `force_rgba8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    Rgba8 {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    Rgba16 {
        width: u32,
        height: u32,
        data: Vec<u16>,
    },
}

impl Image {
    pub fn width(&self) -> u32 {
        match self {
            Image::Rgba8 { width, .. } | Image::Rgba16 { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Image::Rgba8 { height, .. } | Image::Rgba16 { height, .. } => *height,
        }
    }
}

/// Everything a decode produces beyond the pixels: the native format, the
/// palette when present, parsed ancillary records, the raw chunk framing,
/// and the warnings and info notes collected along the way.
#[derive(Debug)]
pub struct Decoded {
    pub image: Image,
    pub details: ImageDetails,
    pub palette: Option<Palette>,
    pub metadata: Vec<Metadata>,
    pub chunks: Vec<ChunkInfo>,
    pub warnings: Vec<Warning>,
    pub info: Vec<String>,
}

/// Per-call decode state: the options snapshot, everything recoverable that
/// went wrong, and which chunk types have been seen already.
struct Context {
    strict: bool,
    warnings: Vec<Warning>,
    info: Vec<String>,
    parsed: HashSet<[u8; 4]>,
}

impl Context {
    fn new(options: &DecodeOptions) -> Self {
        Context {
            strict: options.strict,
            warnings: Vec::new(),
            info: Vec::new(),
            parsed: HashSet::new(),
        }
    }

    fn warn(&mut self, kind: WarningKind, offset: usize) -> Result<(), DecodeError> {
        log::warn!("{kind} (at byte {offset})");
        if self.strict {
            return Err(DecodeError::at(ErrorKind::Strict(kind), offset));
        }
        self.warnings.push(Warning { kind, offset });
        Ok(())
    }

    fn note(&mut self, message: String) {
        log::debug!("{message}");
        self.info.push(message);
    }
}

/// Chunk types that must precede PLTE.
const BEFORE_PLTE: [[u8; 4]; 5] = [*b"cHRM", *b"gAMA", *b"iCCP", *b"sBIT", *b"sRGB"];
/// Chunk types that must precede the first IDAT.
const BEFORE_IDAT: [[u8; 4]; 9] = [
    *b"bKGD", *b"cHRM", *b"gAMA", *b"hIST", *b"iCCP", *b"pHYs", *b"sBIT", *b"sPLT", *b"sRGB",
];

/// Decodes a complete PNG byte stream.
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    let mut ctx = Context::new(options);
    match decode_inner(bytes, options, &mut ctx) {
        Ok(mut decoded) => {
            decoded.warnings = ctx.warnings;
            decoded.info = ctx.info;
            Ok(decoded)
        }
        Err(error) => Err(error.with_warnings(ctx.warnings)),
    }
}

fn decode_inner(
    bytes: &[u8],
    options: &DecodeOptions,
    ctx: &mut Context,
) -> Result<Decoded, DecodeError> {
    let chunks = split_chunks(bytes)?;
    let first = chunks
        .first()
        .ok_or_else(|| DecodeError::at(ErrorKind::MissingHeader, bytes.len()))?;
    if &first.ty != b"IHDR" {
        return Err(DecodeError::at(ErrorKind::MissingHeader, first.offset));
    }
    let header = Ihdr::parse(first.data).map_err(|kind| DecodeError::at(kind, first.offset))?;
    if first.data.len() > Ihdr::DATA_LEN {
        ctx.warn(
            WarningKind::OversizedChunk {
                ty: *b"IHDR",
                expected: Ihdr::DATA_LEN,
                actual: first.data.len(),
            },
            first.offset,
        )?;
    }
    log::debug!(
        "IHDR: {}x{}, bit depth {}, {:?}, {:?}",
        header.width,
        header.height,
        header.bit_depth,
        header.color_type,
        header.interlace
    );

    let mut palette: Option<Palette> = None;
    let mut trns_data: Option<&[u8]> = None;
    let mut trns_offset = 0usize;
    let mut idat_parts: Vec<&[u8]> = Vec::new();
    let mut idat_offset = 0usize;
    let mut idat_done = false;
    let mut iend_seen = false;
    let mut records = Vec::new();
    let mut chunk_infos = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        chunk_infos.push(ChunkInfo::from(chunk));
        if !chunk.crc_ok() {
            ctx.warn(
                WarningKind::CrcMismatch {
                    stored: chunk.crc,
                    computed: chunk.computed_crc,
                },
                chunk.offset,
            )?;
        }
        if chunk.data.len() > 0x7fff_ffff {
            ctx.warn(
                WarningKind::OversizedLength(chunk.data.len() as u32),
                chunk.offset,
            )?;
        }
        if iend_seen {
            ctx.warn(WarningKind::AfterIend(chunk.ty), chunk.offset)?;
            continue;
        }
        if &chunk.ty != b"IDAT" && !idat_parts.is_empty() {
            idat_done = true;
        }
        match &chunk.ty {
            b"IHDR" => {
                if index > 0 {
                    ctx.warn(WarningKind::Duplicate(*b"IHDR"), chunk.offset)?;
                }
            }
            b"PLTE" => {
                if ctx.parsed.contains(b"PLTE") {
                    ctx.warn(WarningKind::Duplicate(*b"PLTE"), chunk.offset)?;
                } else if matches!(
                    header.color_type,
                    ColorType::Grayscale | ColorType::GrayscaleAlpha
                ) {
                    ctx.warn(
                        WarningKind::Forbidden(*b"PLTE", header.color_type as u8),
                        chunk.offset,
                    )?;
                } else {
                    if !idat_parts.is_empty() {
                        ctx.warn(WarningKind::OutOfOrder(*b"PLTE", *b"IDAT"), chunk.offset)?;
                    }
                    for earlier_only in [*b"tRNS", *b"bKGD", *b"hIST", *b"sPLT"] {
                        if ctx.parsed.contains(&earlier_only) {
                            ctx.warn(
                                WarningKind::OutOfOrder(*b"PLTE", earlier_only),
                                chunk.offset,
                            )?;
                        }
                    }
                    palette = Some(
                        Palette::parse(chunk.data)
                            .map_err(|kind| DecodeError::at(kind, chunk.offset))?,
                    );
                }
            }
            b"tRNS" => {
                if ctx.parsed.contains(b"tRNS") {
                    ctx.warn(WarningKind::Duplicate(*b"tRNS"), chunk.offset)?;
                } else if matches!(
                    header.color_type,
                    ColorType::GrayscaleAlpha | ColorType::Rgba
                ) {
                    ctx.warn(
                        WarningKind::Forbidden(*b"tRNS", header.color_type as u8),
                        chunk.offset,
                    )?;
                } else {
                    if !idat_parts.is_empty() {
                        ctx.warn(WarningKind::OutOfOrder(*b"tRNS", *b"IDAT"), chunk.offset)?;
                    }
                    trns_data = Some(chunk.data);
                    trns_offset = chunk.offset;
                }
            }
            b"IDAT" => {
                if idat_done {
                    return Err(DecodeError::at(ErrorKind::SplitImageData, chunk.offset));
                }
                if idat_parts.is_empty() {
                    idat_offset = chunk.offset;
                }
                idat_parts.push(chunk.data);
            }
            b"IEND" => {
                if !chunk.data.is_empty() {
                    ctx.warn(WarningKind::NonEmptyIend(chunk.data.len()), chunk.offset)?;
                }
                iend_seen = true;
            }
            ty if !chunk.is_ancillary() => {
                return Err(DecodeError::at(ErrorKind::UnknownCritical(*ty), chunk.offset));
            }
            ty => match metadata::decoder_for(ty) {
                Some(decoder) => {
                    if ctx.parsed.contains(ty) && !metadata::REPEATABLE.contains(ty) {
                        ctx.warn(WarningKind::Duplicate(*ty), chunk.offset)?;
                    } else {
                        if palette.is_some() && BEFORE_PLTE.contains(ty) {
                            ctx.warn(WarningKind::OutOfOrder(*ty, *b"PLTE"), chunk.offset)?;
                        }
                        if !idat_parts.is_empty() && BEFORE_IDAT.contains(ty) {
                            ctx.warn(WarningKind::OutOfOrder(*ty, *b"IDAT"), chunk.offset)?;
                        }
                        if options.chunk_filter.enabled(ty) {
                            match decoder(chunk.data) {
                                Ok(record) => {
                                    if let (Metadata::hIST(hist), Some(palette)) =
                                        (&record, &palette)
                                    {
                                        if hist.frequencies.len() != palette.len() {
                                            ctx.warn(
                                                WarningKind::HistogramLength {
                                                    hist: hist.frequencies.len(),
                                                    palette: palette.len(),
                                                },
                                                chunk.offset,
                                            )?;
                                        }
                                    }
                                    records.push(record);
                                }
                                Err(kind) => ctx.warn(kind, chunk.offset)?,
                            }
                        }
                    }
                }
                None => ctx.note(format!(
                    "ignoring unknown ancillary chunk {} at byte {}",
                    String::from_utf8_lossy(ty),
                    chunk.offset
                )),
            },
        }
        ctx.parsed.insert(chunk.ty);
    }

    if !iend_seen {
        ctx.warn(WarningKind::MissingIend, bytes.len())?;
    }
    if idat_parts.is_empty() {
        return Err(DecodeError::at(ErrorKind::MissingImageData, bytes.len()));
    }
    if header.color_type == ColorType::Indexed && palette.is_none() {
        return Err(DecodeError::at(ErrorKind::MissingPalette, first.offset));
    }

    let trns = trns_data.map(tRNSChunk::new);
    if let Some(t) = &trns {
        let malformed = match header.color_type {
            ColorType::Grayscale => t.gray_key().is_none(),
            ColorType::Rgb => t.rgb_key().is_none(),
            _ => false,
        };
        if malformed {
            ctx.warn(WarningKind::AncillaryParse(*b"tRNS"), trns_offset)?;
        }
    }

    let compressed: Cow<'_, [u8]> = if idat_parts.len() == 1 {
        Cow::Borrowed(idat_parts[0])
    } else {
        Cow::Owned(idat_parts.concat())
    };
    let data = image_data::decompress_data(&compressed, &header)
        .map_err(|kind| DecodeError::at(kind, idat_offset))?;

    let pixels = pixel::parse_pixels(&data, &header, palette.as_ref(), trns.as_ref())
        .map_err(|kind| DecodeError::at(kind, idat_offset))?;

    Ok(Decoded {
        image: build_image(&pixels, &header, options.force_rgba8),
        details: ImageDetails {
            bit_depth: header.bit_depth,
            color_type: header.color_type,
            interlace: header.interlace,
        },
        palette,
        metadata: records,
        chunks: chunk_infos,
        warnings: Vec::new(),
        info: Vec::new(),
    })
}

fn build_image(pixels: &[Pixel], header: &Ihdr, force_rgba8: bool) -> Image {
    let (width, height) = (header.width, header.height);
    if header.bit_depth == 16 && !force_rgba8 {
        Image::Rgba16 {
            width,
            height,
            data: pixels
                .iter()
                .flat_map(|p| [p.red, p.green, p.blue, p.alpha])
                .collect(),
        }
    } else {
        Image::Rgba8 {
            width,
            height,
            data: pixels
                .iter()
                .flat_map(|p| {
                    [
                        (p.red >> 8) as u8,
                        (p.green >> 8) as u8,
                        (p.blue >> 8) as u8,
                        (p.alpha >> 8) as u8,
                    ]
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub bit_depth: u8,
    pub color_type: ColorType,
    /// Ancillary records to write between the header chunks and the image
    /// data.
    pub ancillary: Vec<Metadata>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            bit_depth: 8,
            color_type: ColorType::Rgba,
            ancillary: Vec::new(),
        }
    }
}

/// Encodes an RGBA image as a complete PNG file in the requested native
/// format. The output is never interlaced.
pub fn encode(image: &Image, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::IllegalDimensions { width, height });
    }
    if !options.color_type.legal_depth(options.bit_depth) {
        return Err(EncodeError::IllegalDepth {
            color_type: options.color_type as u8,
            bit_depth: options.bit_depth,
        });
    }
    let expected = 4 * width as usize * height as usize;
    let actual = match image {
        Image::Rgba8 { data, .. } => data.len(),
        Image::Rgba16 { data, .. } => data.len(),
    };
    if actual != expected {
        return Err(EncodeError::BufferLength { expected, actual });
    }

    let pixels = normalize(image);
    let header = Ihdr {
        width,
        height,
        bit_depth: options.bit_depth,
        color_type: options.color_type,
        interlace: Interlace::None,
    };

    let mut palette = None;
    let mut trns_alphas = None;
    let mut index_of = None;
    if options.color_type == ColorType::Indexed {
        let (pal, alphas, map) = build_palette(&pixels, options.bit_depth)?;
        palette = Some(pal);
        trns_alphas = alphas;
        index_of = Some(map);
    }

    let raw = pixel::pack_scanlines(&pixels, &header, index_of.as_ref());
    let compressed = image_data::compress_data(&raw, &header);

    // Color-space chunks have to land ahead of PLTE to keep the output
    // well ordered; everything else goes between the palette and the data.
    let (pre_palette, post_palette): (Vec<&Metadata>, Vec<&Metadata>) = options
        .ancillary
        .iter()
        .partition(|record| BEFORE_PLTE.contains(&record.chunk_type()));

    let mut out = Vec::with_capacity(compressed.len() + 128);
    out.extend(SIGNATURE);
    out.extend(header.to_bytes());
    for record in pre_palette {
        out.extend(record.to_bytes());
    }
    if let Some(palette) = &palette {
        out.extend(palette.to_bytes());
        if let Some(alphas) = &trns_alphas {
            out.extend(frame_chunk(b"tRNS", alphas));
        }
    }
    for record in post_palette {
        out.extend(record.to_bytes());
    }
    out.extend(idat::frame_image_data(&compressed));
    out.extend(iend::write_end());
    Ok(out)
}

fn normalize(image: &Image) -> Vec<Pixel> {
    match image {
        Image::Rgba8 { data, .. } => data
            .chunks_exact(4)
            .map(|p| Pixel {
                red: p[0] as u16 * 257,
                green: p[1] as u16 * 257,
                blue: p[2] as u16 * 257,
                alpha: p[3] as u16 * 257,
            })
            .collect(),
        Image::Rgba16 { data, .. } => data
            .chunks_exact(4)
            .map(|p| Pixel {
                red: p[0],
                green: p[1],
                blue: p[2],
                alpha: p[3],
            })
            .collect(),
    }
}

type PaletteParts = (Palette, Option<Vec<u8>>, HashMap<[u8; 4], u8>);

/// Collects the distinct 8-bit RGBA colors in first-seen order. The alpha
/// column becomes a tRNS payload, trimmed of trailing opaque entries.
fn build_palette(pixels: &[Pixel], bit_depth: u8) -> Result<PaletteParts, EncodeError> {
    let limit = 1usize << bit_depth;
    let mut index_of = HashMap::new();
    let mut entries = Vec::new();
    let mut alphas = Vec::new();
    for p in pixels {
        let color = pixel::quantized(p);
        if index_of.contains_key(&color) {
            continue;
        }
        if entries.len() == limit {
            return Err(EncodeError::PaletteOverflow { limit, bit_depth });
        }
        index_of.insert(color, entries.len() as u8);
        entries.push(Rgb(color[0], color[1], color[2]));
        alphas.push(color[3]);
    }
    while alphas.last() == Some(&255) {
        alphas.pop();
    }
    let alphas = if alphas.is_empty() { None } else { Some(alphas) };
    Ok((Palette::from_entries(entries), alphas, index_of))
}
