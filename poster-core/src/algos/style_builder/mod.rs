/*!
   Module `style_builder` turns a [Theme] into a vector-tile style document for the external map
   renderer.

   The layer stack is fixed: background, water, parks, landcover, buildings, roads from the thinnest
   class to the thickest, rail. Every colour comes from the theme, so two calls with the same theme
   produce the same document.
*/

mod expressions;
mod road_classes;

pub use expressions::{Filter, ZoomInterpolation};
pub use road_classes::RoadClass;

use crate::{
    constants::{
        BUILDINGS_MIN_ZOOM, GLYPHS_URL, STYLE_NAME_PREFIX, STYLE_VERSION, TILE_SOURCE_ID,
        TILE_SOURCE_URL,
    },
    themes::Theme,
};
use road_classes::{RAIL_DASHES, RAIL_OPACITY, RAIL_WIDTH, RoadColor};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDocument {
    pub version: u8,
    pub name: String,
    pub sources: BTreeMap<&'static str, TileSource>,
    pub glyphs: &'static str,
    pub layers: Vec<Layer>,
}

impl StyleDocument {
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Background,
    Fill,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LineLayout>,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Background {
        #[serde(rename = "background-color")]
        color: &'static str,
    },
    Fill {
        #[serde(rename = "fill-color")]
        color: &'static str,
        #[serde(rename = "fill-opacity", skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
    },
    Line {
        #[serde(rename = "line-color")]
        color: &'static str,
        #[serde(rename = "line-width")]
        width: ZoomInterpolation,
        #[serde(rename = "line-opacity", skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
        #[serde(rename = "line-dasharray", skip_serializing_if = "Option::is_none")]
        dash_array: Option<[f64; 2]>,
    },
}

impl Paint {
    pub fn color(&self) -> &'static str {
        match self {
            Paint::Background { color } | Paint::Fill { color, .. } | Paint::Line { color, .. } => {
                color
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineLayout {
    #[serde(rename = "line-cap")]
    pub cap: &'static str,
    #[serde(rename = "line-join")]
    pub join: &'static str,
}

impl LineLayout {
    fn round() -> Self {
        LineLayout {
            cap: "round",
            join: "round",
        }
    }
}

pub struct StyleBuilder;

impl StyleBuilder {
    pub fn build_for(theme: &Theme) -> StyleDocument {
        let mut layers = Vec::with_capacity(6 + RoadClass::ALL.len());

        layers.push(Layer {
            id: "background",
            kind: LayerKind::Background,
            source: None,
            source_layer: None,
            filter: None,
            minzoom: None,
            layout: None,
            paint: Paint::Background {
                color: theme.background,
            },
        });

        layers.push(Self::fill_layer(
            "water",
            "water",
            None,
            theme.water,
            None,
        ));

        layers.push(Self::fill_layer(
            "landuse-park",
            "landuse",
            Some(Filter::class_in(&[
                "park", "grass", "cemetery", "wood", "forest",
            ])),
            theme.parks_color(),
            Some(0.6),
        ));

        layers.push(Self::fill_layer(
            "landcover",
            "landcover",
            Some(Filter::class_in(&["grass", "wood", "forest"])),
            theme.parks_color(),
            Some(0.4),
        ));

        let mut buildings = Self::fill_layer(
            "buildings",
            "building",
            None,
            theme.buildings_color(),
            Some(0.8),
        );
        buildings.minzoom = Some(BUILDINGS_MIN_ZOOM);
        layers.push(buildings);

        for class in RoadClass::ALL {
            let color = match class.color() {
                RoadColor::Primary => theme.primary_road_color(),
                RoadColor::Secondary => theme.secondary_road_color(),
            };

            layers.push(Layer {
                id: class.layer_id(),
                kind: LayerKind::Line,
                source: Some(TILE_SOURCE_ID),
                source_layer: Some("transportation"),
                filter: Some(class.filter()),
                minzoom: None,
                layout: Some(LineLayout::round()),
                paint: Paint::Line {
                    color,
                    width: class.width(),
                    opacity: class.opacity(),
                    dash_array: None,
                },
            });
        }

        layers.push(Layer {
            id: "rail",
            kind: LayerKind::Line,
            source: Some(TILE_SOURCE_ID),
            source_layer: Some("transportation"),
            filter: Some(Filter::class_eq("rail")),
            minzoom: None,
            layout: None,
            paint: Paint::Line {
                color: theme.primary_road_color(),
                width: RAIL_WIDTH,
                opacity: Some(RAIL_OPACITY),
                dash_array: Some(RAIL_DASHES),
            },
        });

        event!(
            Level::DEBUG,
            "Generated style for theme {} with {} layers",
            theme.id,
            layers.len()
        );

        StyleDocument {
            version: STYLE_VERSION,
            name: format!("{}-{}", STYLE_NAME_PREFIX, theme.id),
            sources: BTreeMap::from([(
                TILE_SOURCE_ID,
                TileSource {
                    kind: "vector",
                    url: TILE_SOURCE_URL,
                },
            )]),
            glyphs: GLYPHS_URL,
            layers,
        }
    }

    fn fill_layer(
        id: &'static str,
        source_layer: &'static str,
        filter: Option<Filter>,
        color: &'static str,
        opacity: Option<f64>,
    ) -> Layer {
        Layer {
            id,
            kind: LayerKind::Fill,
            source: Some(TILE_SOURCE_ID),
            source_layer: Some(source_layer),
            filter,
            minzoom: None,
            layout: None,
            paint: Paint::Fill { color, opacity },
        }
    }
}
