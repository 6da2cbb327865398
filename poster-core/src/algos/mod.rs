mod poster_drawer;
mod projection;
mod style_builder;

pub use poster_drawer::{Placement, PosterDrawer, cover_fit};
pub(crate) use poster_drawer::encode;
pub use projection::{Viewport, radius_to_zoom};
pub use style_builder::{
    Filter, Layer, LayerKind, LineLayout, Paint, RoadClass, StyleBuilder, StyleDocument,
    TileSource, ZoomInterpolation,
};
