use std::io::Cursor;

use image::codecs::gif::GifEncoder;
use image::imageops::FilterType;
use image::{Frame, ImageReader, Limits, RgbaImage};

use crate::{HttpediaError, Result};

/// A valid 1x1 transparent GIF, served when an image cannot be produced.
pub const PLACEHOLDER_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF,
    0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02,
    0x02, 0x44, 0x01, 0x00, 0x3B,
];

/// Neural-net quantizer speed for GIF encoding (1 best, 30 fastest).
const GIF_ENCODER_SPEED: i32 = 10;

/// Decode any supported raster, shrink it to `max_width` and encode a GIF.
///
/// Images narrower than `max_width` keep their size; aspect ratio is always
/// preserved. Transparency is composited onto white, since the output
/// palette has no alpha. Sources with a side above `max_dimension` are
/// refused before their pixels are allocated.
///
/// CPU bound; async callers should run it on a blocking thread.
pub fn transcode_to_gif(bytes: &[u8], max_width: u32, max_dimension: u32) -> Result<Vec<u8>> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| HttpediaError::Transcode(err.to_string()))?;

    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    reader.limits(limits);

    let mut image = reader.decode()?;
    let max_width = max_width.max(1);
    if image.width() > max_width {
        image = image.resize(max_width, image.height(), FilterType::Lanczos3);
    }

    let rgba = flatten_onto_white(image.to_rgba8());

    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut out, GIF_ENCODER_SPEED);
        encoder.encode_frame(Frame::new(rgba))?;
    }
    Ok(out)
}

fn flatten_onto_white(mut rgba: RgbaImage) -> RgbaImage {
    for pixel in rgba.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        for channel in 0..3 {
            let value = u32::from(pixel[channel]);
            pixel[channel] = ((value * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
        pixel[3] = 255;
    }
    rgba
}
