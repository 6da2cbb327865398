pub(crate) const EARTH_CIRCUMFERENCE: f64 = 40_075_016.686;

pub const MIN_ZOOM: f64 = 8.0;
pub const MAX_ZOOM: f64 = 18.0;

pub const MIN_RADIUS: u32 = 4_000;
pub const MAX_RADIUS: u32 = 20_000;
pub const RADIUS_STEP: u32 = 500;

pub(crate) const STYLE_VERSION: u8 = 8;
pub(crate) const STYLE_NAME_PREFIX: &str = "map2poster";
pub(crate) const TILE_SOURCE_ID: &str = "openmaptiles";
pub(crate) const TILE_SOURCE_URL: &str = "https://tiles.openfreemap.org/planet";
pub(crate) const GLYPHS_URL: &str = "https://tiles.openfreemap.org/fonts/{fontstack}/{range}.pbf";

// Buildings are too dense to be readable below this zoom.
pub(crate) const BUILDINGS_MIN_ZOOM: f64 = 13.0;

pub const EXPORT_LONG_EDGE: u32 = 3840;

// Label sizes are authored against this canvas width.
pub(crate) const LABEL_REFERENCE_WIDTH: f32 = 1200.0;

pub(crate) const TOP_FADE_END: f32 = 0.12;
pub(crate) const BOTTOM_FADE_START: f32 = 0.78;

pub(crate) const JPEG_QUALITY: u8 = 95;

// Label faces tried first, in order, before any other loaded face.
pub(crate) const SANS_SERIF_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
    "Roboto",
];
pub(crate) const MONOSPACE_FAMILIES: [&str; 5] = [
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Courier New",
    "Menlo",
];

pub(crate) const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 30;
