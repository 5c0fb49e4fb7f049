use std::collections::HashMap;

use nom::{
    bits::{bits, complete::take},
    error::Error,
    multi::many0,
    sequence::tuple,
    IResult,
};

use crate::chunks::ihdr::{ColorType, Ihdr};
use crate::chunks::plte::{Palette, Rgb};
use crate::chunks::trns::tRNSChunk;
use crate::error::ErrorKind;
use crate::scanlines::layout;

/// One pixel, normalized to 16 bits per channel. Samples below 16 bits are
/// expanded by bit replication, so `value >> 8` recovers the 8-bit form.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub(crate) struct Pixel {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
}

#[derive(Debug)]
struct IndexedPixel(u8);

impl IndexedPixel {
    fn to_pixel(&self, palette: &Palette, trns: Option<&tRNSChunk<'_>>) -> Result<Pixel, ErrorKind> {
        let Rgb(red, green, blue) =
            palette.get(self.0).ok_or(ErrorKind::PaletteIndexOutOfRange {
                index: self.0,
                len: palette.len(),
            })?;
        let alpha = trns.map_or(255, |t| t.palette_alpha(self.0));
        Ok(Pixel {
            red: scale(red as u16, 8),
            green: scale(green as u16, 8),
            blue: scale(blue as u16, 8),
            alpha: scale(alpha as u16, 8),
        })
    }
}

/// Unpacks the reconstructed image stream, scattering each scanline's
/// pixels to the targets its layout record names. The scanlines still
/// carry their leading filter byte.
pub(crate) fn parse_pixels(
    data: &[u8],
    header: &Ihdr,
    palette: Option<&Palette>,
    trns: Option<&tRNSChunk<'_>>,
) -> Result<Vec<Pixel>, ErrorKind> {
    let mut total = vec![Pixel::default(); header.width as usize * header.height as usize];
    for line in layout(header) {
        let scanline = &data[line.data_start..line.data_start + line.data_len];
        let pixels =
            parse_scanline_pixels(scanline, header.color_type, header.bit_depth, palette, trns)?;
        for (offset, pixel) in pixels.into_iter().take(line.width).enumerate() {
            total[line.target_start + offset * line.target_step] = pixel;
        }
    }
    Ok(total)
}

pub(crate) fn parse_scanline_pixels(
    scanline: &[u8],
    color_type: ColorType,
    bit_depth: u8,
    palette: Option<&Palette>,
    trns: Option<&tRNSChunk<'_>>,
) -> Result<Vec<Pixel>, ErrorKind> {
    let body = &scanline[1..];
    let pixels = match color_type {
        ColorType::Grayscale => {
            let key = trns.and_then(|t| t.gray_key());
            bits::<_, _, Error<(&[u8], usize)>, Error<&[u8]>, _>(many0(parse_grayscale(
                bit_depth, key,
            )))(body)
            .map_err(|_| ErrorKind::IllegalHeader)?
            .1
        }
        ColorType::Indexed => {
            let palette = palette.ok_or(ErrorKind::MissingPalette)?;
            bits::<_, _, Error<(&[u8], usize)>, Error<&[u8]>, _>(many0(parse_indexed(bit_depth)))(
                body,
            )
            .map_err(|_| ErrorKind::IllegalHeader)?
            .1
            .into_iter()
            .map(|p| p.to_pixel(palette, trns))
            .collect::<Result<Vec<_>, _>>()?
        }
        ColorType::GrayscaleAlpha => {
            bits::<_, _, Error<(&[u8], usize)>, Error<&[u8]>, _>(many0(parse_grayscale_alpha(
                bit_depth,
            )))(body)
            .map_err(|_| ErrorKind::IllegalHeader)?
            .1
        }
        ColorType::Rgb => {
            let key = trns.and_then(|t| t.rgb_key());
            bits::<_, _, Error<(&[u8], usize)>, Error<&[u8]>, _>(many0(parse_truecolor(
                bit_depth, key,
            )))(body)
            .map_err(|_| ErrorKind::IllegalHeader)?
            .1
        }
        ColorType::Rgba => {
            bits::<_, _, Error<(&[u8], usize)>, Error<&[u8]>, _>(many0(parse_truecolor_alpha(
                bit_depth,
            )))(body)
            .map_err(|_| ErrorKind::IllegalHeader)?
            .1
        }
    };
    Ok(pixels)
}

fn parse_grayscale(
    bit_depth: u8,
    key: Option<u16>,
) -> impl Fn((&[u8], usize)) -> IResult<(&[u8], usize), Pixel> {
    move |input: (&[u8], usize)| {
        let (rest, raw): (_, u16) = take(bit_depth)(input)?;
        let intensity = scale(raw, bit_depth);
        let alpha = if key == Some(raw) { 0 } else { u16::MAX };
        Ok((
            rest,
            Pixel {
                red: intensity,
                green: intensity,
                blue: intensity,
                alpha,
            },
        ))
    }
}

fn parse_indexed(bit_depth: u8) -> impl Fn((&[u8], usize)) -> IResult<(&[u8], usize), IndexedPixel> {
    move |input: (&[u8], usize)| {
        let (rest, index) = take(bit_depth)(input)?;
        Ok((rest, IndexedPixel(index)))
    }
}

fn parse_grayscale_alpha(
    bit_depth: u8,
) -> impl Fn((&[u8], usize)) -> IResult<(&[u8], usize), Pixel> {
    move |input: (&[u8], usize)| {
        let (rest, (raw, alpha)): (_, (u16, u16)) =
            tuple((take(bit_depth), take(bit_depth)))(input)?;
        let intensity = scale(raw, bit_depth);
        Ok((
            rest,
            Pixel {
                red: intensity,
                green: intensity,
                blue: intensity,
                alpha: scale(alpha, bit_depth),
            },
        ))
    }
}

fn parse_truecolor(
    bit_depth: u8,
    key: Option<(u16, u16, u16)>,
) -> impl Fn((&[u8], usize)) -> IResult<(&[u8], usize), Pixel> {
    move |input: (&[u8], usize)| {
        let (rest, (red, green, blue)): (_, (u16, u16, u16)) =
            tuple((take(bit_depth), take(bit_depth), take(bit_depth)))(input)?;
        let alpha = if key == Some((red, green, blue)) { 0 } else { u16::MAX };
        Ok((
            rest,
            Pixel {
                red: scale(red, bit_depth),
                green: scale(green, bit_depth),
                blue: scale(blue, bit_depth),
                alpha,
            },
        ))
    }
}

fn parse_truecolor_alpha(
    bit_depth: u8,
) -> impl Fn((&[u8], usize)) -> IResult<(&[u8], usize), Pixel> {
    move |input: (&[u8], usize)| {
        let (rest, (red, green, blue, alpha)): (_, (u16, u16, u16, u16)) = tuple((
            take(bit_depth),
            take(bit_depth),
            take(bit_depth),
            take(bit_depth),
        ))(input)?;
        Ok((
            rest,
            Pixel {
                red: scale(red, bit_depth),
                green: scale(green, bit_depth),
                blue: scale(blue, bit_depth),
                alpha: scale(alpha, bit_depth),
            },
        ))
    }
}

/// Expands a sample to 16 bits by bit replication.
pub(crate) fn scale(value: u16, from_bit_depth: u8) -> u16 {
    if from_bit_depth == 16 {
        value
    } else {
        value * (u16::MAX / ((1u16 << from_bit_depth) - 1))
    }
}

/// Packs normalized pixels into the native scanline layout for `header`:
/// rows of `scanline_size - 1` bytes, no filter bytes, sub-byte samples
/// packed MSB-first, 16-bit samples big-endian. Indexed images pack the
/// palette index found in `index_of`.
pub(crate) fn pack_scanlines(
    pixels: &[Pixel],
    header: &Ihdr,
    index_of: Option<&HashMap<[u8; 4], u8>>,
) -> Vec<u8> {
    let width = header.width as usize;
    let depth = header.bit_depth;
    let row_length = header.scanline_size(width) - 1;
    let mut out = Vec::with_capacity(row_length * header.height as usize);
    for row in pixels.chunks(width) {
        let mut acc = 0u8;
        let mut acc_bits = 0u8;
        for pixel in row {
            for sample in native_samples(pixel, header.color_type, depth, index_of) {
                match depth {
                    16 => out.extend(sample.to_be_bytes()),
                    8 => out.push((sample >> 8) as u8),
                    _ => {
                        acc = (acc << depth) | (sample >> (16 - depth)) as u8;
                        acc_bits += depth;
                        if acc_bits == 8 {
                            out.push(acc);
                            acc = 0;
                            acc_bits = 0;
                        }
                    }
                }
            }
        }
        if acc_bits > 0 {
            out.push(acc << (8 - acc_bits));
        }
    }
    out
}

/// The channel samples a pixel contributes in the native layout, most
/// significant channel first, still in 16-bit normalized form except for
/// palette indices.
fn native_samples(
    pixel: &Pixel,
    color_type: ColorType,
    bit_depth: u8,
    index_of: Option<&HashMap<[u8; 4], u8>>,
) -> Vec<u16> {
    match color_type {
        ColorType::Grayscale => vec![pixel.red],
        ColorType::GrayscaleAlpha => vec![pixel.red, pixel.alpha],
        ColorType::Rgb => vec![pixel.red, pixel.green, pixel.blue],
        ColorType::Rgba => vec![pixel.red, pixel.green, pixel.blue, pixel.alpha],
        ColorType::Indexed => {
            let index = index_of
                .and_then(|map| map.get(&quantized(pixel)).copied())
                .unwrap_or(0);
            // Position the index so that `>> (16 - depth)` recovers it.
            vec![(index as u16) << (16 - bit_depth)]
        }
    }
}

/// A pixel reduced to its 8-bit RGBA form, the key used for palette lookups.
pub(crate) fn quantized(pixel: &Pixel) -> [u8; 4] {
    [
        (pixel.red >> 8) as u8,
        (pixel.green >> 8) as u8,
        (pixel.blue >> 8) as u8,
        (pixel.alpha >> 8) as u8,
    ]
}
