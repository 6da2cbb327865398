use crate::{
    constants::{EXPORT_LONG_EDGE, MAX_RADIUS, MIN_RADIUS, RADIUS_STEP},
    themes::Theme,
};

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::Serialize;
use thiserror::Error;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Formats the position the way it is printed under the city name,
    /// e.g. `59.3290° N / 18.0680° E`.
    pub fn to_poster_string(&self) -> String {
        format!(
            "{} / {}",
            format_coordinate(self.lat, Axis::Latitude),
            format_coordinate(self.lng, Axis::Longitude)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

pub fn format_coordinate(value: f64, axis: Axis) -> String {
    let direction = match axis {
        Axis::Latitude if value >= 0.0 => "N",
        Axis::Latitude => "S",
        Axis::Longitude if value >= 0.0 => "E",
        Axis::Longitude => "W",
    };

    format!("{:.4}° {}", value.abs(), direction)
}

/// A poster radius in meters, restricted to the values the radius slider offers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Radius(u32);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "radius {0} m is not between {min} and {max} m in steps of {step} m",
    min = MIN_RADIUS,
    max = MAX_RADIUS,
    step = RADIUS_STEP
)]
pub struct RadiusOutOfRangeError(pub u32);

impl Radius {
    pub fn new(meters: u32) -> Result<Self, RadiusOutOfRangeError> {
        if !(MIN_RADIUS..=MAX_RADIUS).contains(&meters) || (meters - MIN_RADIUS) % RADIUS_STEP != 0
        {
            return Err(RadiusOutOfRangeError(meters));
        }

        Ok(Self(meters))
    }

    pub fn meters(&self) -> u32 {
        self.0
    }

    /// Every value the slider can produce, smallest first.
    pub fn all() -> impl Iterator<Item = Radius> {
        (MIN_RADIUS..=MAX_RADIUS)
            .step_by(RADIUS_STEP as usize)
            .map(Radius)
    }
}

impl Default for Radius {
    fn default() -> Self {
        Radius(PosterDefaults::RADIUS)
    }
}

impl Display for Radius {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{} km", self.0 / 1000)
        } else {
            write!(f, "{:.1} km", self.0 as f64 / 1000.0)
        }
    }
}

#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AspectRatio {
    #[cfg_attr(feature = "cli", value(name = "1:1"))]
    #[serde(rename = "1:1")]
    Square,
    #[cfg_attr(feature = "cli", value(name = "4:3"))]
    #[serde(rename = "4:3")]
    Landscape,
    #[default]
    #[cfg_attr(feature = "cli", value(name = "3:4"))]
    #[serde(rename = "3:4")]
    Portrait,
    #[cfg_attr(feature = "cli", value(name = "16:9"))]
    #[serde(rename = "16:9")]
    Widescreen,
    #[cfg_attr(feature = "cli", value(name = "9:16"))]
    #[serde(rename = "9:16")]
    Tall,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(r#"unknown aspect ratio: "{0}""#)]
pub struct ParseAspectRatioError(pub String);

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Widescreen,
        AspectRatio::Tall,
    ];

    /// The (width, height) terms of the ratio, e.g. (16, 9).
    pub fn terms(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::Landscape => (4, 3),
            AspectRatio::Portrait => (3, 4),
            AspectRatio::Widescreen => (16, 9),
            AspectRatio::Tall => (9, 16),
        }
    }

    /// Pixel size of an exported poster: the long edge is always
    /// [`EXPORT_LONG_EDGE`] and the short edge is rounded to the nearest pixel.
    pub fn export_dimensions(&self) -> (u32, u32) {
        let (w, h) = self.terms();
        let short_edge = |short: u32, long: u32| {
            (EXPORT_LONG_EDGE as f64 * (short as f64 / long as f64)).round() as u32
        };

        if w >= h {
            (EXPORT_LONG_EDGE, short_edge(h, w))
        } else {
            (short_edge(w, h), EXPORT_LONG_EDGE)
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.terms();
        write!(f, "{}:{}", w, h)
    }
}

impl FromStr for AspectRatio {
    type Err = ParseAspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.to_string() == s)
            .ok_or_else(|| ParseAspectRatioError(s.to_string()))
    }
}

#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(r#"unknown export format: "{0}""#)]
pub struct ParseExportFormatError(pub String);

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ParseExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "png" => ExportFormat::Png,
            "jpeg" | "jpg" => ExportFormat::Jpeg,
            "webp" => ExportFormat::Webp,
            _ => return Err(ParseExportFormatError(s.to_string())),
        })
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Png => write!(f, "png"),
            ExportFormat::Jpeg => write!(f, "jpeg"),
            ExportFormat::Webp => write!(f, "webp"),
        }
    }
}

/// A `#rrggbb` colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(r#"invalid hex colour: "{0}""#)]
pub struct ParseHexColorError(pub String);

impl FromStr for HexColor {
    type Err = ParseHexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHexColorError(s.to_string());

        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }

        let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).map_err(|_| err());

        Ok(HexColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl HexColor {
    pub fn to_skia(self, alpha: f32) -> tiny_skia::Color {
        let mut color = tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255);
        color.set_alpha(alpha);
        color
    }
}

/// Settings the poster editor starts from.
pub struct PosterDefaults;

impl PosterDefaults {
    pub const CITY: &'static str = "Stockholm";
    pub const COUNTRY: &'static str = "Sweden";
    pub const LOCATION: LatLng = LatLng::new(59.329, 18.068);
    pub const THEME: &'static str = "noir";
    pub const RADIUS: u32 = 10_000;
    pub const SHOW_LABELS: bool = true;
    pub const FORMAT: ExportFormat = ExportFormat::Png;
    pub const ASPECT_RATIO: AspectRatio = AspectRatio::Portrait;
}

/// Snapshot of the editor state at the moment an export is triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub city: String,
    pub country: String,
    pub location: LatLng,
    pub theme: &'static Theme,
    pub show_labels: bool,
    pub format: ExportFormat,
    pub aspect_ratio: AspectRatio,
}

impl ExportRequest {
    pub fn dimensions(&self) -> (u32, u32) {
        self.aspect_ratio.export_dimensions()
    }

    pub fn filename(&self) -> String {
        let (width, height) = self.dimensions();
        artifact_filename(&self.city, width, height, self.format)
    }
}

/// Builds `{city}-{width}x{height}.{ext}` with the city lower-cased and every
/// run of whitespace replaced by a single hyphen.
pub fn artifact_filename(city: &str, width: u32, height: u32, format: ExportFormat) -> String {
    let mut slug = String::with_capacity(city.len());
    let mut in_whitespace = false;

    for c in city.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }

    if city.trim().is_empty() {
        slug = String::from("poster");
    }

    format!("{}-{}x{}.{}", slug, width, height, format.extension())
}

/// A finished poster, ready to be handed to the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

impl std::fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("filename", &self.filename)
            .finish()
    }
}
