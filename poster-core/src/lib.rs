mod algos;
mod constants;
mod types;

pub mod compositor;
pub mod delivery;
pub mod geocode;
pub mod surface;
pub mod themes;

use tracing::{Level, event, span};

pub use algos::{
    Filter, Layer, LayerKind, LineLayout, Paint, Placement, PosterDrawer, RoadClass,
    StyleDocument, TileSource, Viewport, ZoomInterpolation, cover_fit, radius_to_zoom,
};
pub use compositor::{Compositor, ExportConfig, ExportError, ExportState, WaitStage};
pub use constants::{EXPORT_LONG_EDGE, MAX_RADIUS, MAX_ZOOM, MIN_RADIUS, MIN_ZOOM, RADIUS_STEP};
pub use delivery::{ArtifactSink, DirectorySink};
pub use surface::{RenderSurface, StillSurface, SurfaceEvent};
pub use themes::{Theme, default_theme, get_theme_by_id};
pub use types::{
    AspectRatio, Axis, ExportArtifact, ExportFormat, ExportRequest, HexColor, LatLng,
    ParseAspectRatioError, ParseExportFormatError, ParseHexColorError, PosterDefaults, Radius,
    RadiusOutOfRangeError, artifact_filename, format_coordinate,
};

/// Builds the map style document for `theme`.
pub fn generate_style(theme: &Theme) -> StyleDocument {
    algos::StyleBuilder::build_for(theme)
}

/// Pixel size of the exported poster for `aspect_ratio`.
pub fn export_dimensions(aspect_ratio: AspectRatio) -> (u32, u32) {
    aspect_ratio.export_dimensions()
}

/// Points `surface` at `center` with the style of `theme`, zoomed so that `radius` fits.
pub fn configure_surface<S: RenderSurface + ?Sized>(
    surface: &S,
    theme: &Theme,
    center: LatLng,
    radius: Radius,
) -> Viewport {
    let span = span!(Level::DEBUG, "configure_surface");
    let _guard = span.enter();

    let viewport = Viewport::from_radius(center, radius);

    surface.set_style(&generate_style(theme));
    surface.set_viewport(viewport);

    event!(
        Level::DEBUG,
        "Surface set to theme {} at zoom {:.3} for {}",
        theme.id,
        viewport.zoom,
        radius
    );

    viewport
}
