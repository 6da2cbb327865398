/*!
   Module `themes` holds the fixed catalog of poster themes.

   The catalog is a static table: it is read-only for the lifetime of the process, so lookups hand
   out `&'static Theme` references instead of clones.
*/

use serde::Serialize;

/// Road colouring of a theme: every road class in one colour, or a
/// `[primary, secondary]` pair where secondary roads get their own colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Roads {
    Single(&'static str),
    Pair([&'static str; 2]),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub background: &'static str,
    pub roads: Roads,
    pub water: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parks: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildings: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<&'static str>,
}

impl Theme {
    pub fn primary_road_color(&self) -> &'static str {
        match self.roads {
            Roads::Single(color) => color,
            Roads::Pair([primary, _]) => primary,
        }
    }

    pub fn secondary_road_color(&self) -> &'static str {
        match self.roads {
            Roads::Single(color) => color,
            Roads::Pair([_, secondary]) => secondary,
        }
    }

    pub fn label_color(&self) -> &'static str {
        self.labels.unwrap_or_else(|| self.primary_road_color())
    }

    pub fn parks_color(&self) -> &'static str {
        self.parks.unwrap_or(self.water)
    }

    pub fn buildings_color(&self) -> &'static str {
        self.buildings.unwrap_or(self.background)
    }
}

/// The first entry doubles as the fallback for unknown ids.
pub static THEMES: [Theme; 17] = [
    Theme {
        id: "noir",
        name: "Noir",
        background: "#000000",
        roads: Roads::Single("#ffffff"),
        water: "#1a1a2e",
        parks: Some("#0d1a0d"),
        buildings: Some("#1a1a1a"),
        labels: Some("#ffffff"),
    },
    Theme {
        id: "midnight_blue",
        name: "Midnight Blue",
        background: "#0a1628",
        roads: Roads::Single("#d4af37"),
        water: "#1a3a5c",
        parks: Some("#1a2f1a"),
        buildings: Some("#0f1f38"),
        labels: Some("#d4af37"),
    },
    Theme {
        id: "blueprint",
        name: "Blueprint",
        background: "#1e3a5f",
        roads: Roads::Single("#87ceeb"),
        water: "#2a4a6f",
        parks: Some("#2a5a4f"),
        buildings: Some("#1a3050"),
        labels: Some("#87ceeb"),
    },
    Theme {
        id: "neon_cyberpunk",
        name: "Neon Cyberpunk",
        background: "#0d0221",
        roads: Roads::Pair(["#ff00ff", "#00ffff"]),
        water: "#1a0a2e",
        parks: Some("#0a1f0a"),
        buildings: Some("#150530"),
        labels: Some("#ff00ff"),
    },
    Theme {
        id: "japanese_ink",
        name: "Japanese Ink",
        background: "#f5f5dc",
        roads: Roads::Single("#2c2c2c"),
        water: "#4a6741",
        parks: Some("#8fbc8f"),
        buildings: Some("#e8e8c8"),
        labels: Some("#2c2c2c"),
    },
    Theme {
        id: "sunset",
        name: "Sunset",
        background: "#1a0a0a",
        roads: Roads::Pair(["#ff6b35", "#ff8c42"]),
        water: "#2d1f3d",
        parks: Some("#2d1f1f"),
        buildings: Some("#251515"),
        labels: Some("#ff6b35"),
    },
    Theme {
        id: "forest",
        name: "Forest",
        background: "#1a2f1a",
        roads: Roads::Single("#8fbc8f"),
        water: "#2d4a3a",
        parks: Some("#3d5a3d"),
        buildings: Some("#152515"),
        labels: Some("#8fbc8f"),
    },
    Theme {
        id: "ocean",
        name: "Ocean",
        background: "#0a2a3a",
        roads: Roads::Single("#4ecdc4"),
        water: "#1a4a5a",
        parks: Some("#1a3a3a"),
        buildings: Some("#082030"),
        labels: Some("#4ecdc4"),
    },
    Theme {
        id: "vintage",
        name: "Vintage",
        background: "#f4e9d9",
        roads: Roads::Single("#8b4513"),
        water: "#6b8e8e",
        parks: Some("#9cb89c"),
        buildings: Some("#e8dcc8"),
        labels: Some("#8b4513"),
    },
    Theme {
        id: "arctic",
        name: "Arctic",
        background: "#e8f4f8",
        roads: Roads::Single("#2c3e50"),
        water: "#5dade2",
        parks: Some("#a8d8dc"),
        buildings: Some("#d8e8ec"),
        labels: Some("#2c3e50"),
    },
    Theme {
        id: "copper",
        name: "Copper",
        background: "#1a1210",
        roads: Roads::Single("#b87333"),
        water: "#2a3a3a",
        parks: Some("#2a3020"),
        buildings: Some("#201815"),
        labels: Some("#b87333"),
    },
    Theme {
        id: "lavender",
        name: "Lavender",
        background: "#2d1f3d",
        roads: Roads::Single("#dda0dd"),
        water: "#3d2f4d",
        parks: Some("#3d3f4d"),
        buildings: Some("#251530"),
        labels: Some("#dda0dd"),
    },
    Theme {
        id: "emerald",
        name: "Emerald",
        background: "#0a1f0a",
        roads: Roads::Single("#50c878"),
        water: "#1a3a2a",
        parks: Some("#2a4a2a"),
        buildings: Some("#081808"),
        labels: Some("#50c878"),
    },
    Theme {
        id: "rose_gold",
        name: "Rose Gold",
        background: "#1a1015",
        roads: Roads::Single("#e8b4b8"),
        water: "#2a2025",
        parks: Some("#2a2520"),
        buildings: Some("#201520"),
        labels: Some("#e8b4b8"),
    },
    Theme {
        id: "monochrome",
        name: "Monochrome",
        background: "#1a1a1a",
        roads: Roads::Single("#cccccc"),
        water: "#333333",
        parks: Some("#2a2a2a"),
        buildings: Some("#252525"),
        labels: Some("#cccccc"),
    },
    Theme {
        id: "coral",
        name: "Coral",
        background: "#1a1520",
        roads: Roads::Single("#ff7f50"),
        water: "#2a3040",
        parks: Some("#2a3530"),
        buildings: Some("#201a25"),
        labels: Some("#ff7f50"),
    },
    Theme {
        id: "mint",
        name: "Mint",
        background: "#0f2520",
        roads: Roads::Single("#98fb98"),
        water: "#1a4040",
        parks: Some("#2a5045"),
        buildings: Some("#0a201a"),
        labels: Some("#98fb98"),
    },
];

pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

/// Looks a theme up by id, falling back to [`default_theme`] for unknown ids.
pub fn get_theme_by_id(id: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.id == id)
        .unwrap_or_else(default_theme)
}

pub fn primary_road_color(theme: &Theme) -> &'static str {
    theme.primary_road_color()
}

pub fn secondary_road_color(theme: &Theme) -> &'static str {
    theme.secondary_road_color()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::HexColor;

    use std::collections::HashSet;

    #[test]
    fn test_unknown_id_falls_back_to_first_theme() {
        assert_eq!(get_theme_by_id("does-not-exist").id, "noir");
        assert_eq!(get_theme_by_id("").id, "noir");
        assert_eq!(get_theme_by_id("sunset").name, "Sunset");
    }

    #[test]
    fn test_road_colors_are_never_empty() {
        for theme in THEMES.iter() {
            assert!(!primary_road_color(theme).is_empty(), "{}", theme.id);
            assert!(!secondary_road_color(theme).is_empty(), "{}", theme.id);
        }
    }

    #[test]
    fn test_secondary_road_color_fallback() {
        let noir = get_theme_by_id("noir");
        assert_eq!(noir.secondary_road_color(), noir.primary_road_color());

        let cyberpunk = get_theme_by_id("neon_cyberpunk");
        assert_eq!(cyberpunk.primary_road_color(), "#ff00ff");
        assert_eq!(cyberpunk.secondary_road_color(), "#00ffff");
    }

    #[test]
    fn test_optional_color_fallbacks() {
        let bare = Theme {
            id: "bare",
            name: "Bare",
            background: "#101010",
            roads: Roads::Single("#eeeeee"),
            water: "#202040",
            parks: None,
            buildings: None,
            labels: None,
        };

        assert_eq!(bare.parks_color(), "#202040");
        assert_eq!(bare.buildings_color(), "#101010");
        assert_eq!(bare.label_color(), "#eeeeee");
    }

    #[test]
    fn test_catalog_is_valid() {
        let ids: HashSet<_> = THEMES.iter().map(|theme| theme.id).collect();
        assert_eq!(ids.len(), THEMES.len(), "theme ids must be unique");

        for theme in THEMES.iter() {
            let colors = [
                Some(theme.background),
                Some(theme.water),
                Some(theme.primary_road_color()),
                Some(theme.secondary_road_color()),
                theme.parks,
                theme.buildings,
                theme.labels,
            ];

            for color in colors.into_iter().flatten() {
                assert!(
                    color.parse::<HexColor>().is_ok(),
                    "theme {} has invalid colour {}",
                    theme.id,
                    color
                );
            }
        }
    }
}
