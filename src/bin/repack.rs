use anyhow::Context;
use rawpng::{decode, encode, DecodeOptions, EncodeOptions, Image};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let input_path = args.next().context("usage: repack <input.png> [output.png]")?;
    let output_path = args.next().unwrap_or_else(|| "output.png".to_owned());

    let input = std::fs::read(&input_path).with_context(|| format!("failed to read {input_path}"))?;
    let decoded = decode(&input, &DecodeOptions::default())
        .with_context(|| format!("failed to decode {input_path}"))?;

    for warning in &decoded.warnings {
        eprintln!("warning: {warning}");
    }
    for note in &decoded.info {
        eprintln!("info: {note}");
    }

    let bit_depth = match decoded.image {
        Image::Rgba8 { .. } => 8,
        Image::Rgba16 { .. } => 16,
    };
    let options = EncodeOptions {
        bit_depth,
        color_type: decoded.details.color_type,
        ancillary: decoded.metadata.clone(),
    };
    let output = encode(&decoded.image, &options)
        .with_context(|| format!("failed to re-encode {input_path}"))?;
    std::fs::write(&output_path, output)
        .with_context(|| format!("failed to write {output_path}"))?;
    Ok(())
}
