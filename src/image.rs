use std::fs::File;
use std::path::Path;

use thiserror::Error;

/// Decoded image as a tightly packed RGB8 buffer.
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub fn load_png(path: impl AsRef<Path>) -> Result<RgbImage, ImageError> {
    let file = File::open(path)?;

    let decoder = png::Decoder::new(file);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedFormat(info.color_type, info.bit_depth));
    }

    let pixels = match info.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => strip_alpha(&buf),
        other => return Err(ImageError::UnsupportedFormat(other, info.bit_depth)),
    };

    Ok(RgbImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}

fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Could not open image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode image: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("Unsupported image format: {0:?} at {1:?} bit depth")]
    UnsupportedFormat(png::ColorType, png::BitDepth),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_alpha_keeps_color_channels() {
        let rgba = [10, 20, 30, 255, 40, 50, 60, 128];

        assert_eq!(strip_alpha(&rgba), vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn strip_alpha_on_empty_input() {
        assert_eq!(strip_alpha(&[]), Vec::<u8>::new());
    }
}
