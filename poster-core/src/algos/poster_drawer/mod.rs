/*!
   Module `poster_drawer` composites a captured map raster into a poster canvas.

   The canvas size only depends on the requested aspect ratio. The captured map is scaled
   uniformly to cover the whole canvas, then the edges are faded into the theme background and
   the optional labels are drawn on top.
*/

mod cover_fit;
mod encode;
mod overlays;

pub use cover_fit::{Placement, cover_fit};
pub(crate) use encode::encode;

use crate::{
    compositor::ExportError,
    types::{ExportRequest, HexColor},
};
use overlays::{draw_fades, draw_labels, label_overlay};

use std::sync::Arc;

use tiny_skia::{
    ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, PremultipliedColorU8, Transform,
};
use tracing::{Level, event, span};
use usvg::fontdb;

pub struct PosterDrawer {
    fontdb: Arc<fontdb::Database>,
}

impl PosterDrawer {
    pub fn new(fontdb: fontdb::Database) -> Self {
        PosterDrawer {
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn draw(&self, captured: &[u8], request: &ExportRequest) -> Result<Pixmap, ExportError> {
        let span = span!(Level::DEBUG, "draw_poster");
        let _guard = span.enter();

        let (width, height) = request.dimensions();

        let background: HexColor = request
            .theme
            .background
            .parse()
            .map_err(|err| ExportError::CompositeFailed(format!("{}", err)))?;

        let mut canvas = Pixmap::new(width, height).ok_or_else(|| {
            ExportError::CompositeFailed(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        canvas.fill(background.to_skia(1.0));

        let map = decode_raster(captured)?;
        let placement = cover_fit((map.width(), map.height()), (width, height));

        event!(
            Level::DEBUG,
            "Drawing {}x{} capture as {:.1}x{:.1} at ({:.1}, {:.1})",
            map.width(),
            map.height(),
            placement.draw_width,
            placement.draw_height,
            placement.offset_x,
            placement.offset_y
        );

        let transform = Transform::from_row(
            placement.scale_x(map.width()) as f32,
            0.0,
            0.0,
            placement.scale_y(map.height()) as f32,
            placement.offset_x as f32,
            placement.offset_y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        canvas.draw_pixmap(0, 0, map.as_ref(), &paint, transform, None);

        draw_fades(&mut canvas, background)?;

        if request.show_labels {
            let overlay = label_overlay(request, width, height);
            draw_labels(&mut canvas, &overlay, &self.fontdb)?;
        }

        Ok(canvas)
    }
}

/// Decodes an encoded raster (png, jpeg or webp) into a premultiplied pixmap.
fn decode_raster(bytes: &[u8]) -> Result<Pixmap, ExportError> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| ExportError::DecodeFailed(err.to_string()))?
        .into_rgba8();

    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height).ok_or_else(|| {
        ExportError::DecodeFailed(format!("captured raster is {}x{}", width, height))
    })?;

    let data = image
        .pixels()
        .flat_map(|pixel| {
            let [r, g, b, a] = pixel.0;
            let color: PremultipliedColorU8 = ColorU8::from_rgba(r, g, b, a).premultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();

    Pixmap::from_vec(data, size)
        .ok_or_else(|| ExportError::DecodeFailed(String::from("raster data does not fit its size")))
}
