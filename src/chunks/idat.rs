use super::frame_chunk;

/// Largest data length a single chunk may declare.
const MAX_DATA: usize = 0x7fff_ffff;

/// Frames a compressed image stream as one IDAT chunk, splitting only when
/// the stream exceeds the per-chunk length limit.
pub(crate) fn frame_image_data(compressed: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(compressed.len() + 12);
    if compressed.is_empty() {
        out.extend(frame_chunk(b"IDAT", &[]));
        return out;
    }
    for part in compressed.chunks(MAX_DATA) {
        out.extend(frame_chunk(b"IDAT", part));
    }
    out
}
