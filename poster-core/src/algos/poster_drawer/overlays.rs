use crate::{
    compositor::ExportError,
    constants::{BOTTOM_FADE_START, LABEL_REFERENCE_WIDTH, TOP_FADE_END},
    types::{ExportRequest, HexColor},
};

use std::sync::Arc;

use svg::{Document, node::element::Text};
use tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform,
};
use usvg::fontdb;

const SANS_SERIF: &str = "system-ui, sans-serif";
const MONOSPACE: &str = "monospace";

/// Fades the top and bottom edges of the map into the theme background.
pub(crate) fn draw_fades(canvas: &mut Pixmap, background: HexColor) -> Result<(), ExportError> {
    let height = canvas.height() as f32;

    let opaque = background.to_skia(1.0);
    let clear = background.to_skia(0.0);

    fill_vertical_gradient(canvas, 0.0, height * TOP_FADE_END, opaque, clear)?;
    fill_vertical_gradient(canvas, height * BOTTOM_FADE_START, height, clear, opaque)?;

    Ok(())
}

fn fill_vertical_gradient(
    canvas: &mut Pixmap,
    from_y: f32,
    to_y: f32,
    from: Color,
    to: Color,
) -> Result<(), ExportError> {
    let width = canvas.width() as f32;

    let shader = LinearGradient::new(
        Point::from_xy(0.0, from_y),
        Point::from_xy(0.0, to_y),
        vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| {
        ExportError::CompositeFailed(format!("invalid gradient from y={} to y={}", from_y, to_y))
    })?;

    let rect = Rect::from_ltrb(0.0, from_y, width, to_y).ok_or_else(|| {
        ExportError::CompositeFailed(format!("invalid fade area from y={} to y={}", from_y, to_y))
    })?;

    let paint = Paint {
        shader,
        anti_alias: false,
        ..Paint::default()
    };

    canvas.fill_rect(rect, &paint, Transform::identity(), None);

    Ok(())
}

/// Builds the city, country and coordinate lines as an SVG overlay sized to the poster.
///
/// Text sizes are authored for a 1200 px wide poster and scaled with the output width. Lines are
/// centred horizontally and vertically anchored on their `y` position.
pub(crate) fn label_overlay(request: &ExportRequest, width: u32, height: u32) -> Document {
    let scale = width as f32 / LABEL_REFERENCE_WIDTH;
    let color = request.theme.label_color();
    let center_x = width as f32 / 2.0;
    let bottom = height as f32;

    let line = |content: String, size: f32, y: f32, family: &str| {
        Text::new(content)
            .set("x", center_x)
            .set("y", bottom - y * scale)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", family)
            .set("font-size", (size * scale).round())
            .set("fill", color)
    };

    let city = line(request.city.to_uppercase(), 72.0, 150.0, SANS_SERIF).set("font-weight", "bold");
    let country = line(request.country.to_uppercase(), 28.0, 90.0, SANS_SERIF)
        .set("fill-opacity", 0.7);
    let coordinates =
        line(request.location.to_poster_string(), 20.0, 45.0, MONOSPACE).set("fill-opacity", 0.5);

    Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height))
        .add(city)
        .add(country)
        .add(coordinates)
}

/// Renders the label overlay onto the canvas.
///
/// Text without a matching face would be dropped silently, so both label families must resolve
/// to a loaded face before anything is drawn.
pub(crate) fn draw_labels(
    canvas: &mut Pixmap,
    overlay: &Document,
    fontdb: &Arc<fontdb::Database>,
) -> Result<(), ExportError> {
    for (family, name) in [
        (fontdb::Family::SansSerif, SANS_SERIF),
        (fontdb::Family::Monospace, MONOSPACE),
    ] {
        let query = fontdb::Query {
            families: &[family],
            ..fontdb::Query::default()
        };

        if fontdb.query(&query).is_none() {
            return Err(ExportError::CompositeFailed(format!(
                "no font face for labels in {}",
                name
            )));
        }
    }

    let options = {
        let mut options = usvg::Options::default();

        options.fontdb = Arc::clone(fontdb);

        options
    };

    let tree = usvg::Tree::from_str(&overlay.to_string(), &options)
        .map_err(|err| ExportError::CompositeFailed(format!("label overlay: {}", err)))?;

    resvg::render(&tree, Transform::identity(), &mut canvas.as_mut());

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        themes::get_theme_by_id,
        types::{AspectRatio, ExportFormat, LatLng},
    };

    fn request() -> ExportRequest {
        ExportRequest {
            city: String::from("Stockholm"),
            country: String::from("Sweden"),
            location: LatLng::new(59.329, 18.068),
            theme: get_theme_by_id("noir"),
            show_labels: true,
            format: ExportFormat::Png,
            aspect_ratio: AspectRatio::Portrait,
        }
    }

    #[test]
    fn test_label_overlay_lines() {
        let overlay = label_overlay(&request(), 2880, 3840).to_string();

        assert!(overlay.contains("STOCKHOLM"));
        assert!(overlay.contains("SWEDEN"));
        assert!(overlay.contains("59.3290° N / 18.0680° E"));
        assert!(overlay.contains(r#"text-anchor="middle""#));
        assert!(overlay.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn test_label_overlay_scales_with_width() {
        // 2880 / 1200 = 2.4
        let overlay = label_overlay(&request(), 2880, 3840).to_string();

        assert!(overlay.contains(r#"x="1440""#));
        // City: 72 * 2.4 = 172.8 -> 173, placed at 3840 - 150 * 2.4 = 3480.
        assert!(overlay.contains(r#"font-size="173""#));
        assert!(overlay.contains(r#"y="3480""#));
        // Country: 28 * 2.4 = 67.2 -> 67, at 3840 - 90 * 2.4 = 3624.
        assert!(overlay.contains(r#"font-size="67""#));
        assert!(overlay.contains(r#"y="3624""#));
        // Coordinates: 20 * 2.4 = 48, at 3840 - 45 * 2.4 = 3732.
        assert!(overlay.contains(r#"font-size="48""#));
        assert!(overlay.contains(r#"y="3732""#));
    }

    #[test]
    fn test_fades_reach_background_at_edges() {
        let mut canvas = Pixmap::new(40, 100).unwrap();
        canvas.fill(Color::from_rgba8(255, 255, 255, 255));

        let background = HexColor { r: 0, g: 0, b: 0 };
        draw_fades(&mut canvas, background).unwrap();

        let top = canvas.pixel(20, 0).unwrap();
        let middle = canvas.pixel(20, 50).unwrap();
        let bottom = canvas.pixel(20, 99).unwrap();

        assert!(top.red() < 16, "top row should be close to the background");
        assert_eq!(middle.red(), 255, "the middle of the map is untouched");
        assert!(bottom.red() < 16, "bottom row should be close to the background");
    }
}
