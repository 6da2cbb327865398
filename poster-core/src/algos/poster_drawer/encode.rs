use crate::{compositor::ExportError, constants::JPEG_QUALITY, types::ExportFormat};

use image::{
    ExtendedColorType, ImageEncoder,
    codecs::{jpeg::JpegEncoder, webp::WebPEncoder},
};
use tiny_skia::Pixmap;

/// Encodes the finished canvas into the requested image format.
pub(crate) fn encode(canvas: &Pixmap, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (canvas.width(), canvas.height());

    match format {
        ExportFormat::Png => canvas
            .encode_png()
            .map_err(|err| ExportError::EncodeFailed(err.to_string())),
        ExportFormat::Jpeg => {
            let mut bytes = Vec::new();

            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
                .write_image(&rgb(canvas), width, height, ExtendedColorType::Rgb8)
                .map_err(|err| ExportError::EncodeFailed(err.to_string()))?;

            Ok(bytes)
        }
        ExportFormat::Webp => {
            let mut bytes = Vec::new();

            // The pure-Rust WebP encoder only writes lossless images.
            WebPEncoder::new_lossless(&mut bytes)
                .write_image(&rgba(canvas), width, height, ExtendedColorType::Rgba8)
                .map_err(|err| ExportError::EncodeFailed(err.to_string()))?;

            Ok(bytes)
        }
    }
}

fn rgba(canvas: &Pixmap) -> Vec<u8> {
    canvas
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect()
}

// JPEG has no alpha channel; the canvas is opaque once the background is filled.
fn rgb(canvas: &Pixmap) -> Vec<u8> {
    canvas
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue()]
        })
        .collect()
}
