//! A PNG codec with chunk-level access: decode byte streams into RGBA
//! buffers plus metadata, encode RGBA buffers back into PNG files.
//!
//! Decoding is lenient by default: recoverable problems (bad CRCs, ordering
//! violations, duplicate chunks) are collected as [`Warning`]s with their
//! byte offsets, and [`DecodeOptions::strict`] turns each of them into an
//! error instead.

pub mod chunks;
mod crc;
mod error;
mod filters;
mod image_data;
mod interlacing;
mod metadata;
mod pixel;
mod png;
mod scanlines;

pub use chunks::ihdr::{ColorType, Interlace};
pub use chunks::plte::{Palette, Rgb};
pub use chunks::{ChunkInfo, RawChunk, SIGNATURE};
pub use crc::crc32;
pub use error::{DecodeError, EncodeError, ErrorKind, Warning, WarningKind};
pub use metadata::Metadata;
pub use png::{decode, encode, ChunkFilter, DecodeOptions, Decoded, EncodeOptions, Image, ImageDetails};
