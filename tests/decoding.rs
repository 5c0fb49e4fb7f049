use miniz_oxide::deflate::compress_to_vec_zlib;
use rawpng::{
    crc32, decode, ChunkFilter, ColorType, DecodeOptions, ErrorKind, Image, Interlace, Metadata,
    WarningKind, SIGNATURE,
};

fn chunk(ty: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend(ty);
    out.extend(data);
    out.extend(crc32(ty.iter().copied().chain(data.iter().copied())).to_be_bytes());
    out
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
    let mut data = width.to_be_bytes().to_vec();
    data.extend(height.to_be_bytes());
    data.extend([bit_depth, color_type, 0, 0, interlace]);
    chunk(b"IHDR", &data)
}

fn idat(raw_scanlines: &[u8]) -> Vec<u8> {
    chunk(b"IDAT", &compress_to_vec_zlib(raw_scanlines, 6))
}

fn png_from(parts: &[Vec<u8>]) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();
    for part in parts {
        out.extend(part);
    }
    out
}

fn gray_1x1(value: u8) -> Vec<u8> {
    png_from(&[
        ihdr(1, 1, 8, 0, 0),
        idat(&[0, value]),
        chunk(b"IEND", b""),
    ])
}

fn rgba8_data(decoded: &rawpng::Decoded) -> &[u8] {
    match &decoded.image {
        Image::Rgba8 { data, .. } => data,
        Image::Rgba16 { .. } => panic!("expected an 8-bit image"),
    }
}

#[test]
fn rejects_inputs_without_the_signature() {
    for input in [&b""[..], &b"\x89PNG"[..], &b"definitely not a png file"[..]] {
        let err = decode(input, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Signature);
        assert_eq!(err.offset, 0);
    }
}

#[test]
fn signature_alone_is_not_a_png() {
    let err = decode(&SIGNATURE, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingHeader);
}

#[test]
fn decodes_a_minimal_grayscale_pixel() {
    let decoded = decode(&gray_1x1(0xab), &DecodeOptions::default()).unwrap();
    assert_eq!(rgba8_data(&decoded), &[0xab, 0xab, 0xab, 0xff]);
    assert_eq!(decoded.details.bit_depth, 8);
    assert_eq!(decoded.details.color_type, ColorType::Grayscale);
    assert_eq!(decoded.details.interlace, Interlace::None);
    assert_eq!(decoded.chunks.len(), 3);
    assert!(decoded.warnings.is_empty());
    assert!(decoded.info.is_empty());
}

#[test]
fn raw_chunk_records_carry_verifiable_offsets() {
    let bytes = gray_1x1(0x55);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    for info in &decoded.chunks {
        let type_and_data = &bytes[info.offset + 4..info.offset + 8 + info.data_len];
        assert_eq!(crc32(type_and_data.iter().copied()), info.crc);
        assert!(info.crc_ok);
    }
    assert_eq!(decoded.chunks[0].offset, 8);
    assert_eq!(&decoded.chunks[0].ty, b"IHDR");
}

#[test]
fn corrupt_crc_is_one_warning_at_the_chunk_offset() {
    let mut bytes = gray_1x1(0xab);
    // The second chunk (IDAT) starts right after the 25-byte IHDR chunk.
    let idat_offset = 8 + 25;
    let crc_byte = bytes.len() - 12 - 1;
    bytes[crc_byte] ^= 0x40;
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].offset, idat_offset);
    assert!(matches!(
        decoded.warnings[0].kind,
        WarningKind::CrcMismatch { .. }
    ));
    // The pixel data itself still decodes.
    assert_eq!(rgba8_data(&decoded), &[0xab, 0xab, 0xab, 0xff]);
}

#[test]
fn strict_mode_promotes_warnings_to_errors() {
    let mut bytes = gray_1x1(0xab);
    let crc_byte = bytes.len() - 12 - 1;
    bytes[crc_byte] ^= 0x40;
    let options = DecodeOptions {
        strict: true,
        ..DecodeOptions::default()
    };
    let err = decode(&bytes, &options).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::Strict(WarningKind::CrcMismatch { .. })
    ));
    assert_eq!(err.offset, 8 + 25);
}

#[test]
fn illegal_color_depth_pair_is_fatal() {
    let bytes = png_from(&[ihdr(1, 1, 4, 2, 0), idat(&[0, 0]), chunk(b"IEND", b"")]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::IllegalDepth {
            color_type: 2,
            bit_depth: 4
        }
    );
    assert_eq!(err.offset, 8);
}

#[test]
fn split_idat_runs_are_fatal() {
    let compressed = compress_to_vec_zlib(&[0, 0xab], 6);
    let (first, second) = compressed.split_at(2);
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"IDAT", first),
        chunk(b"tEXt", b"k\0v"),
        chunk(b"IDAT", second),
        chunk(b"IEND", b""),
    ]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SplitImageData);
    let second_idat_offset = 8 + 25 + (12 + 2) + (12 + 3);
    assert_eq!(err.offset, second_idat_offset);
}

#[test]
fn consecutive_idat_chunks_concatenate() {
    let compressed = compress_to_vec_zlib(&[0, 0xab], 6);
    let (first, second) = compressed.split_at(3);
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"IDAT", first),
        chunk(b"IDAT", second),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(rgba8_data(&decoded), &[0xab, 0xab, 0xab, 0xff]);
    assert!(decoded.warnings.is_empty());
}

#[test]
fn unknown_critical_chunks_are_fatal() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"ABCD", b"xx"),
        idat(&[0, 0]),
        chunk(b"IEND", b""),
    ]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownCritical(*b"ABCD"));
    assert_eq!(err.offset, 8 + 25);
}

#[test]
fn unknown_ancillary_chunks_are_informational() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"abXa", b"whatever"),
        idat(&[0, 0]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert!(decoded.warnings.is_empty());
    assert!(decoded.metadata.is_empty());
    assert_eq!(decoded.info.len(), 1);
    assert!(decoded.info[0].contains("abXa"));
}

#[test]
fn missing_iend_is_a_warning() {
    let bytes = png_from(&[ihdr(1, 1, 8, 0, 0), idat(&[0, 7])]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::MissingIend);
    assert_eq!(decoded.warnings[0].offset, bytes.len());
}

#[test]
fn chunks_after_iend_are_ignored_with_a_warning() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        idat(&[0, 7]),
        chunk(b"IEND", b""),
        chunk(b"tEXt", b"late\0entry"),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::AfterIend(*b"tEXt"));
    assert!(decoded.metadata.is_empty());
    // The late chunk is still part of the framing record.
    assert_eq!(decoded.chunks.len(), 4);
}

#[test]
fn nonempty_iend_is_a_warning() {
    let bytes = png_from(&[ihdr(1, 1, 8, 0, 0), idat(&[0, 7]), chunk(b"IEND", b"x")]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::NonEmptyIend(1));
}

#[test]
fn missing_idat_is_fatal() {
    let bytes = png_from(&[ihdr(1, 1, 8, 0, 0), chunk(b"IEND", b"")]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingImageData);
}

#[test]
fn truncation_reports_the_broken_chunk_offset() {
    let bytes = gray_1x1(1);
    let iend_offset = bytes.len() - 12;
    let err = decode(&bytes[..bytes.len() - 4], &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Truncated);
    assert_eq!(err.offset, iend_offset);
}

#[test]
fn text_chunks_become_metadata_records() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"tEXt", b"Title\0Lena"),
        chunk(b"gAMA", &45455u32.to_be_bytes()),
        idat(&[0, 0]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.metadata.len(), 2);
    let Metadata::tEXt(text) = &decoded.metadata[0] else {
        panic!("expected tEXt first");
    };
    assert_eq!(text.keyword, "Title");
    assert_eq!(text.text, "Lena");
    assert_eq!(decoded.metadata[1].chunk_type(), *b"gAMA");
}

#[test]
fn chunk_filter_disables_metadata_parsing() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"tEXt", b"Title\0Lena"),
        idat(&[0, 0]),
        chunk(b"IEND", b""),
    ]);
    let options = DecodeOptions {
        chunk_filter: ChunkFilter::Only(vec![*b"gAMA"]),
        ..DecodeOptions::default()
    };
    let decoded = decode(&bytes, &options).unwrap();
    assert!(decoded.metadata.is_empty());
    assert!(decoded.warnings.is_empty());
    // The chunk is still framed and listed.
    assert_eq!(decoded.chunks.len(), 4);
}

#[test]
fn duplicate_singular_ancillary_chunks_warn_once() {
    let gamma = chunk(b"gAMA", &45455u32.to_be_bytes());
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        gamma.clone(),
        gamma,
        idat(&[0, 0]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.metadata.len(), 1);
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::Duplicate(*b"gAMA"));
}

#[test]
fn malformed_ancillary_chunks_warn_but_do_not_halt() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"gAMA", &[1, 2]),
        idat(&[0, 9]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert!(decoded.metadata.is_empty());
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(
        decoded.warnings[0].kind,
        WarningKind::AncillaryParse(*b"gAMA")
    );
    assert_eq!(rgba8_data(&decoded), &[9, 9, 9, 0xff]);
}

#[test]
fn plte_for_a_grayscale_image_is_a_warning() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"PLTE", &[1, 2, 3]),
        idat(&[0, 7]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::Forbidden(*b"PLTE", 0));
    assert!(decoded.palette.is_none());
}

#[test]
fn trns_for_an_alpha_color_type_is_a_warning() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 6, 0),
        chunk(b"tRNS", &[0, 1]),
        idat(&[0, 1, 2, 3, 4]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::Forbidden(*b"tRNS", 6));
    assert_eq!(rgba8_data(&decoded), &[1, 2, 3, 4]);
}

#[test]
fn invalid_palette_length_is_fatal() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 3, 0),
        chunk(b"PLTE", &[1, 2, 3, 4]),
        idat(&[0, 0]),
        chunk(b"IEND", b""),
    ]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IllegalPaletteLength(4));
}

#[test]
fn indexed_without_a_palette_is_fatal() {
    let bytes = png_from(&[ihdr(1, 1, 8, 3, 0), idat(&[0, 0]), chunk(b"IEND", b"")]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingPalette);
}

#[test]
fn indexed_pixels_resolve_through_palette_and_trns() {
    let bytes = png_from(&[
        ihdr(2, 1, 8, 3, 0),
        chunk(b"PLTE", &[255, 0, 0, 0, 0, 255]),
        chunk(b"tRNS", &[128]),
        idat(&[0, 0, 1]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(
        rgba8_data(&decoded),
        &[255, 0, 0, 128, 0, 0, 255, 255]
    );
    assert_eq!(decoded.palette.as_ref().map(|p| p.len()), Some(2));
    assert!(decoded.warnings.is_empty());
}

#[test]
fn out_of_range_palette_index_is_fatal() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 3, 0),
        chunk(b"PLTE", &[1, 2, 3]),
        idat(&[0, 5]),
        chunk(b"IEND", b""),
    ]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::PaletteIndexOutOfRange { index: 5, len: 1 }
    );
}

#[test]
fn grayscale_trns_key_clears_alpha() {
    let bytes = png_from(&[
        ihdr(2, 1, 8, 0, 0),
        chunk(b"tRNS", &[0x00, 0xab]),
        idat(&[0, 0xab, 0x01]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(
        rgba8_data(&decoded),
        &[0xab, 0xab, 0xab, 0x00, 0x01, 0x01, 0x01, 0xff]
    );
}

#[test]
fn one_bit_grayscale_expands_to_full_range() {
    // 32x32, every scanline solid white: 1 filter byte + 4 data bytes.
    let mut raw = Vec::new();
    for _ in 0..32 {
        raw.extend([0, 0xff, 0xff, 0xff, 0xff]);
    }
    let bytes = png_from(&[ihdr(32, 32, 1, 0, 0), idat(&raw), chunk(b"IEND", b"")]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    let data = rgba8_data(&decoded);
    assert_eq!(data.len(), 4096);
    assert_eq!(data[0], 0xff);
    assert!(data.chunks_exact(4).all(|p| p == [0xff, 0xff, 0xff, 0xff]));
}

#[test]
fn interlaced_and_plain_images_decode_identically() {
    // 2x2 RGBA8. Plain layout: two rows of eight samples.
    #[rustfmt::skip]
    let plain_raw = [
        0, 1, 2, 3, 4, 5, 6, 7, 8,
        0, 9, 10, 11, 12, 13, 14, 15, 16,
    ];
    // Adam7 layout: pass 1 holds (0,0), pass 6 holds (1,0), pass 7 row 1.
    #[rustfmt::skip]
    let interlaced_raw = [
        0, 1, 2, 3, 4,
        0, 5, 6, 7, 8,
        0, 9, 10, 11, 12, 13, 14, 15, 16,
    ];
    let plain = png_from(&[ihdr(2, 2, 8, 6, 0), idat(&plain_raw), chunk(b"IEND", b"")]);
    let interlaced = png_from(&[
        ihdr(2, 2, 8, 6, 1),
        idat(&interlaced_raw),
        chunk(b"IEND", b""),
    ]);
    let plain = decode(&plain, &DecodeOptions::default()).unwrap();
    let interlaced = decode(&interlaced, &DecodeOptions::default()).unwrap();
    assert_eq!(plain.image, interlaced.image);
    assert_eq!(interlaced.details.interlace, Interlace::Adam7);
    let expected: Vec<u8> = (1..=16).collect();
    assert_eq!(rgba8_data(&plain), &expected[..]);
}

#[test]
fn interlaced_sixteen_bit_gray_decodes() {
    // 3x3 gray 16-bit, Adam7. Passes: 1 (1x1), 4 (1x1), 5 (2x1 at y=2),
    // 6 (1x2), 7 (3x1 at y=1).
    let mut raw = Vec::new();
    raw.extend([0, 0x00, 0x00]); // pass 1: (0,0)
    raw.extend([0, 0x22, 0x22]); // pass 4: (2,0)
    raw.extend([0, 0x66, 0x66, 0x88, 0x88]); // pass 5: (0,2) (2,2)
    raw.extend([0, 0x11, 0x11]); // pass 6: (1,0)
    raw.extend([0, 0x77, 0x77]); // pass 6: (1,2)
    raw.extend([0, 0x33, 0x33, 0x44, 0x44, 0x55, 0x55]); // pass 7: row 1
    let bytes = png_from(&[ihdr(3, 3, 16, 0, 1), idat(&raw), chunk(b"IEND", b"")]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    let Image::Rgba16 { data, .. } = &decoded.image else {
        panic!("expected 16-bit output");
    };
    let grays: Vec<u16> = data.chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(
        grays,
        [0x0000, 0x1111, 0x2222, 0x3333, 0x4444, 0x5555, 0x6666, 0x7777, 0x8888]
    );
}

#[test]
fn second_ihdr_is_a_warning() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 0, 0),
        ihdr(1, 1, 8, 0, 0),
        idat(&[0, 7]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, WarningKind::Duplicate(*b"IHDR"));
}

#[test]
fn first_chunk_must_be_ihdr() {
    let bytes = png_from(&[
        chunk(b"gAMA", &45455u32.to_be_bytes()),
        ihdr(1, 1, 8, 0, 0),
        idat(&[0, 7]),
        chunk(b"IEND", b""),
    ]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingHeader);
    assert_eq!(err.offset, 8);
}

#[test]
fn errors_carry_previously_collected_warnings() {
    // A corrupt CRC on IHDR (warning), then a split IDAT run (fatal).
    let compressed = compress_to_vec_zlib(&[0, 0xab], 6);
    let (first, second) = compressed.split_at(2);
    let mut header = ihdr(1, 1, 8, 0, 0);
    let last = header.len() - 1;
    header[last] ^= 0x01;
    let bytes = png_from(&[
        header,
        chunk(b"IDAT", first),
        chunk(b"tEXt", b"k\0v"),
        chunk(b"IDAT", second),
        chunk(b"IEND", b""),
    ]);
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SplitImageData);
    assert_eq!(err.warnings.len(), 1);
    assert!(matches!(
        err.warnings[0].kind,
        WarningKind::CrcMismatch { .. }
    ));
}

#[test]
fn plte_after_idat_is_a_warning() {
    let bytes = png_from(&[
        ihdr(1, 1, 8, 2, 0),
        idat(&[0, 1, 2, 3]),
        chunk(b"PLTE", &[1, 2, 3]),
        chunk(b"IEND", b""),
    ]);
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(
        decoded.warnings[0].kind,
        WarningKind::OutOfOrder(*b"PLTE", *b"IDAT")
    );
}
