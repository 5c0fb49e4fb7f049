use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::{decompress_to_vec_zlib_with_limit, TINFLStatus};

use crate::chunks::ihdr::{Ihdr, Interlace};
use crate::error::ErrorKind;
use crate::filters::{filter_scanlines, reconstruct_scanlines};
use crate::interlacing::Adam7Iter;

/// Exact inflated size of the filtered image stream: every scanline of
/// every (reduced) image plus one filter byte each. `None` when the
/// arithmetic overflows.
pub(crate) fn expected_data_len(header: &Ihdr) -> Option<usize> {
    let pixel_bits = header.pixel_bits();
    match header.interlace {
        Interlace::None => region_len(header.width as usize, header.height as usize, pixel_bits),
        Interlace::Adam7 => Adam7Iter::new(header.width as usize, header.height as usize)
            .try_fold(0usize, |total, pass| {
                total.checked_add(region_len(pass.width, pass.height, pixel_bits)?)
            }),
    }
}

fn region_len(width: usize, height: usize, pixel_bits: usize) -> Option<usize> {
    let row = width.checked_mul(pixel_bits)?.div_ceil(8).checked_add(1)?;
    row.checked_mul(height)
}

/// Inflates the concatenated IDAT payload and undoes the scanline filters.
/// The stream must inflate to exactly the expected length.
pub(crate) fn decompress_data(compressed: &[u8], header: &Ihdr) -> Result<Vec<u8>, ErrorKind> {
    let expected = expected_data_len(header).ok_or(ErrorKind::OversizedImage)?;
    let mut data = decompress_to_vec_zlib_with_limit(compressed, expected).map_err(|e| {
        if e.status == TINFLStatus::HasMoreOutput {
            ErrorKind::ExcessImageData { expected }
        } else {
            ErrorKind::Inflate(e.to_string())
        }
    })?;
    if data.len() != expected {
        return Err(ErrorKind::TruncatedImageData {
            expected,
            actual: data.len(),
        });
    }
    log::debug!("inflated {} bytes of image data", data.len());
    reconstruct_scanlines(&mut data, header)?;
    Ok(data)
}

/// Filters the raw scanlines and deflates them into a zlib stream.
pub(crate) fn compress_data(raw: &[u8], header: &Ihdr) -> Vec<u8> {
    let row_length = header.scanline_size(header.width as usize) - 1;
    let filtered = filter_scanlines(raw, row_length, header.filter_width());
    compress_to_vec_zlib(&filtered, 9)
}
