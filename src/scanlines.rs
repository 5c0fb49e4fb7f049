use crate::chunks::ihdr::{Ihdr, Interlace};
use crate::interlacing::Adam7Iter;

/// Geometry of one scanline of the inflated image stream: where its bytes
/// sit (filter byte included), how many pixels it holds, and where those
/// pixels land in the full image. Within a single line the targets are an
/// arithmetic progression, for plain rows with step 1 and for Adam7 pass
/// rows with the pass's column stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scanline {
    pub(crate) data_start: usize,
    pub(crate) data_len: usize,
    pub(crate) width: usize,
    pub(crate) target_start: usize,
    pub(crate) target_step: usize,
}

/// Precomputes every scanline of the image, in stream order.
pub(crate) fn layout(header: &Ihdr) -> Vec<Scanline> {
    let full_width = header.width as usize;
    let mut lines = Vec::with_capacity(header.height as usize);
    match header.interlace {
        Interlace::None => {
            let data_len = header.scanline_size(full_width);
            for row in 0..header.height as usize {
                lines.push(Scanline {
                    data_start: row * data_len,
                    data_len,
                    width: full_width,
                    target_start: row * full_width,
                    target_step: 1,
                });
            }
        }
        Interlace::Adam7 => {
            let mut data_start = 0;
            for pass in Adam7Iter::new(full_width, header.height as usize) {
                let data_len = header.scanline_size(pass.width);
                for row in 0..pass.height {
                    let y = pass.y_start + row * pass.y_stride;
                    lines.push(Scanline {
                        data_start,
                        data_len,
                        width: pass.width,
                        target_start: y * full_width + pass.x_start,
                        target_step: pass.x_stride,
                    });
                    data_start += data_len;
                }
            }
        }
    }
    lines
}
