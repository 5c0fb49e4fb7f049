use crate::chunks::ihdr::{Ihdr, Interlace};
use crate::error::ErrorKind;
use crate::interlacing::Adam7Iter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Filter {
    None,
    Sub,
    Up,
    Average,
    Paeth,
}

pub(crate) const ALL_FILTERS: [Filter; 5] = [
    Filter::None,
    Filter::Sub,
    Filter::Up,
    Filter::Average,
    Filter::Paeth,
];

impl Filter {
    pub(crate) fn type_byte(self) -> u8 {
        match self {
            Filter::None => 0,
            Filter::Sub => 1,
            Filter::Up => 2,
            Filter::Average => 3,
            Filter::Paeth => 4,
        }
    }

    pub(crate) fn filter(self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => x,
            Filter::Sub => x.wrapping_sub(a),
            Filter::Up => x.wrapping_sub(b),
            Filter::Average => x.wrapping_sub(((a as u16 + b as u16) / 2) as u8),
            Filter::Paeth => x.wrapping_sub(paeth_predictor(a, b, c)),
        }
    }

    pub(crate) fn reconstruct(self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => x,
            Filter::Sub => x.wrapping_add(a),
            Filter::Up => x.wrapping_add(b),
            Filter::Average => x.wrapping_add(((a as u16 + b as u16) / 2) as u8),
            Filter::Paeth => x.wrapping_add(paeth_predictor(a, b, c)),
        }
    }
}

impl TryFrom<u8> for Filter {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self, ErrorKind> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            3 => Ok(Self::Average),
            4 => Ok(Self::Paeth),
            other => Err(ErrorKind::InvalidFilter(other)),
        }
    }
}

/// Three-neighbor predictor: picks whichever of left, above, above-left is
/// closest to `a + b - c`, breaking ties in that order.
fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Undoes the per-scanline filters in place. Interlaced data is seven
/// independent sub-images, each with its own scanline length and its own
/// "previous row" state.
pub(crate) fn reconstruct_scanlines(image_data: &mut [u8], header: &Ihdr) -> Result<(), ErrorKind> {
    let filter_width = header.filter_width();
    match header.interlace {
        Interlace::None => {
            let scanline_length = header.scanline_size(header.width as usize);
            reconstruct_region(image_data, scanline_length, header.height as usize, filter_width)
        }
        Interlace::Adam7 => {
            let mut start = 0;
            for pass in Adam7Iter::new(header.width as usize, header.height as usize) {
                let scanline_length = header.scanline_size(pass.width);
                let end = start + scanline_length * pass.height;
                reconstruct_region(
                    &mut image_data[start..end],
                    scanline_length,
                    pass.height,
                    filter_width,
                )?;
                start = end;
            }
            Ok(())
        }
    }
}

fn reconstruct_region(
    image_data: &mut [u8],
    scanline_length: usize,
    line_count: usize,
    filter_width: usize,
) -> Result<(), ErrorKind> {
    // First scanline: no row above, a-only.
    let filter = Filter::try_from(image_data[0])?;
    let first_end = scanline_length.min(filter_width + 1);
    for i in 1..first_end {
        image_data[i] = filter.reconstruct(image_data[i], 0, 0, 0);
    }
    for i in (filter_width + 1)..scanline_length {
        image_data[i] = filter.reconstruct(image_data[i], image_data[i - filter_width], 0, 0);
    }

    for line in 1..line_count {
        let filter = Filter::try_from(image_data[line * scanline_length])?;
        let (start, stop) = (line * scanline_length + 1, (line + 1) * scanline_length);
        for i in start..(start + filter_width).min(stop) {
            image_data[i] = filter.reconstruct(image_data[i], 0, image_data[i - scanline_length], 0);
        }
        for i in (start + filter_width)..stop {
            let a = image_data[i - filter_width];
            let b = image_data[i - scanline_length];
            let c = image_data[i - filter_width - scanline_length];
            image_data[i] = filter.reconstruct(image_data[i], a, b, c);
        }
    }
    Ok(())
}

/// Filters raw scanlines for encoding. `raw` holds rows of `row_length`
/// bytes with no filter bytes; the result has each row prefixed with the
/// type byte of whichever filter minimized the sum of absolute signed
/// byte values.
pub(crate) fn filter_scanlines(raw: &[u8], row_length: usize, filter_width: usize) -> Vec<u8> {
    let line_count = raw.len() / row_length.max(1);
    let mut out = Vec::with_capacity(raw.len() + line_count);
    let mut candidate = vec![0u8; row_length];
    let mut best = vec![0u8; row_length];
    for (line, row) in raw.chunks_exact(row_length).enumerate() {
        let previous = (line > 0).then(|| &raw[(line - 1) * row_length..line * row_length]);
        let mut best_filter = Filter::None;
        let mut best_score = u64::MAX;
        for filter in ALL_FILTERS {
            for (i, &x) in row.iter().enumerate() {
                let a = if i >= filter_width { row[i - filter_width] } else { 0 };
                let b = previous.map_or(0, |p| p[i]);
                let c = if i >= filter_width {
                    previous.map_or(0, |p| p[i - filter_width])
                } else {
                    0
                };
                candidate[i] = filter.filter(x, a, b, c);
            }
            let score: u64 = candidate
                .iter()
                .map(|&v| (v as i8).unsigned_abs() as u64)
                .sum();
            if score < best_score {
                best_score = score;
                best_filter = filter;
                std::mem::swap(&mut best, &mut candidate);
            }
        }
        out.push(best_filter.type_byte());
        out.extend_from_slice(&best);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paeth_picks_the_nearest_neighbor() {
        assert_eq!(paeth_predictor(0, 0, 0), 0);
        assert_eq!(paeth_predictor(5, 5, 5), 5);
        assert_eq!(paeth_predictor(10, 20, 30), 10);
        assert_eq!(paeth_predictor(30, 20, 10), 30);
        assert_eq!(paeth_predictor(10, 30, 20), 20);
        // pb and pc tie at 1: b wins the tie over c.
        assert_eq!(paeth_predictor(5, 2, 4), 2);
        assert_eq!(paeth_predictor(100, 2, 3), 100);
    }

    #[test]
    fn each_filter_inverts_its_own_transform() {
        for filter in ALL_FILTERS {
            for x in [0u8, 1, 127, 128, 200, 255] {
                let (a, b, c) = (13u8, 200u8, 255u8);
                let filtered = filter.filter(x, a, b, c);
                assert_eq!(filter.reconstruct(filtered, a, b, c), x);
            }
        }
    }

    #[test]
    fn filter_type_bytes_round_trip() {
        for filter in ALL_FILTERS {
            assert_eq!(Filter::try_from(filter.type_byte()), Ok(filter));
        }
        assert_eq!(Filter::try_from(5), Err(ErrorKind::InvalidFilter(5)));
    }

    #[test]
    fn reconstructs_a_sub_filtered_row() {
        let mut data = vec![1, 10, 10, 10, 10];
        reconstruct_region(&mut data, 5, 1, 1).unwrap();
        assert_eq!(data, vec![1, 10, 20, 30, 40]);
    }

    #[test]
    fn reconstructs_an_up_filtered_second_row() {
        let mut data = vec![0, 5, 6, 2, 1, 1];
        reconstruct_region(&mut data, 3, 2, 1).unwrap();
        assert_eq!(data, vec![0, 5, 6, 2, 6, 7]);
    }

    #[test]
    fn invalid_filter_byte_is_fatal() {
        let mut data = vec![9, 0, 0];
        assert_eq!(
            reconstruct_region(&mut data, 3, 1, 1),
            Err(ErrorKind::InvalidFilter(9))
        );
    }

    #[test]
    fn filtering_then_reconstructing_is_identity() {
        let header = Ihdr {
            width: 4,
            height: 3,
            bit_depth: 8,
            color_type: crate::chunks::ihdr::ColorType::GrayscaleAlpha,
            interlace: Interlace::None,
        };
        let raw: Vec<u8> = (0u8..24).map(|v| v.wrapping_mul(37)).collect();
        let mut filtered = filter_scanlines(&raw, 8, header.filter_width());
        assert_eq!(filtered.len(), 27);
        reconstruct_scanlines(&mut filtered, &header).unwrap();
        for (line, row) in raw.chunks_exact(8).enumerate() {
            assert_eq!(&filtered[line * 9 + 1..(line + 1) * 9], row);
        }
    }

    #[test]
    fn flat_rows_pick_a_cheap_filter() {
        let filtered = filter_scanlines(&[7u8; 8], 4, 1);
        assert_eq!(filtered.len(), 10);
        // Sub zeroes everything after the first byte of the first row; Up
        // zeroes the whole second row.
        assert_eq!(filtered[0], Filter::Sub.type_byte());
        assert_eq!(&filtered[1..5], &[7, 0, 0, 0]);
        assert_eq!(filtered[5], Filter::Up.type_byte());
        assert_eq!(&filtered[6..10], &[0, 0, 0, 0]);
    }
}
