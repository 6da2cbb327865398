use super::expressions::{Filter, ZoomInterpolation};

/// Road classes drawn on the poster, ordered from the thinnest to the thickest line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoadClass {
    Service,
    Minor,
    Tertiary,
    Secondary,
    Primary,
    Trunk,
    Motorway,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum RoadColor {
    Primary,
    Secondary,
}

impl RoadClass {
    /// Drawing order: later entries are painted on top.
    pub const ALL: [RoadClass; 7] = [
        RoadClass::Service,
        RoadClass::Minor,
        RoadClass::Tertiary,
        RoadClass::Secondary,
        RoadClass::Primary,
        RoadClass::Trunk,
        RoadClass::Motorway,
    ];

    pub fn layer_id(&self) -> &'static str {
        match self {
            RoadClass::Service => "road-service",
            RoadClass::Minor => "road-minor",
            RoadClass::Tertiary => "road-tertiary",
            RoadClass::Secondary => "road-secondary",
            RoadClass::Primary => "road-primary",
            RoadClass::Trunk => "road-trunk",
            RoadClass::Motorway => "road-motorway",
        }
    }

    pub fn filter(&self) -> Filter {
        match self {
            RoadClass::Service => Filter::class_in(&["service", "path", "track"]),
            RoadClass::Minor => Filter::class_in(&["minor", "residential", "living_street"]),
            RoadClass::Tertiary => Filter::class_eq("tertiary"),
            RoadClass::Secondary => Filter::class_eq("secondary"),
            RoadClass::Primary => Filter::class_eq("primary"),
            RoadClass::Trunk => Filter::class_eq("trunk"),
            RoadClass::Motorway => Filter::class_eq("motorway"),
        }
    }

    /// Line width in device pixels by zoom.
    pub fn width(&self) -> ZoomInterpolation {
        match self {
            RoadClass::Service => {
                ZoomInterpolation::linear(&[(12.0, 0.3), (16.0, 1.0), (20.0, 2.0)])
            }
            RoadClass::Minor => ZoomInterpolation::linear(&[(10.0, 0.3), (14.0, 1.0), (18.0, 3.0)]),
            RoadClass::Tertiary => {
                ZoomInterpolation::linear(&[(10.0, 0.5), (14.0, 2.0), (18.0, 5.0)])
            }
            RoadClass::Secondary => {
                ZoomInterpolation::linear(&[(8.0, 0.5), (12.0, 2.0), (16.0, 6.0)])
            }
            RoadClass::Primary => {
                ZoomInterpolation::linear(&[(6.0, 0.5), (10.0, 2.0), (14.0, 5.0), (18.0, 8.0)])
            }
            RoadClass::Trunk => {
                ZoomInterpolation::linear(&[(6.0, 0.8), (10.0, 2.5), (14.0, 6.0), (18.0, 10.0)])
            }
            RoadClass::Motorway => {
                ZoomInterpolation::linear(&[(5.0, 1.0), (10.0, 3.0), (14.0, 7.0), (18.0, 12.0)])
            }
        }
    }

    pub fn width_at(&self, zoom: f64) -> f64 {
        self.width().value_at(zoom)
    }

    // The three main arteries are drawn fully opaque.
    pub fn opacity(&self) -> Option<f64> {
        match self {
            RoadClass::Service => Some(0.5),
            RoadClass::Minor => Some(0.7),
            RoadClass::Tertiary => Some(0.8),
            RoadClass::Secondary => Some(0.9),
            RoadClass::Primary | RoadClass::Trunk | RoadClass::Motorway => None,
        }
    }

    pub(crate) fn color(&self) -> RoadColor {
        match self {
            RoadClass::Secondary => RoadColor::Secondary,
            _ => RoadColor::Primary,
        }
    }
}

pub(crate) const RAIL_WIDTH: ZoomInterpolation =
    ZoomInterpolation::linear(&[(10.0, 0.5), (14.0, 1.5), (18.0, 3.0)]);
pub(crate) const RAIL_OPACITY: f64 = 0.6;
pub(crate) const RAIL_DASHES: [f64; 2] = [3.0, 3.0];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_width_tables_are_monotonic() {
        for class in RoadClass::ALL {
            let width = class.width();
            assert!(width.has_increasing_breakpoints(), "{:?}", class);
            assert!(width.is_non_decreasing(), "{:?}", class);
        }

        assert!(RAIL_WIDTH.has_increasing_breakpoints());
        assert!(RAIL_WIDTH.is_non_decreasing());
    }

    #[test]
    fn test_higher_classes_are_never_thinner() {
        // Sample every quarter zoom level across the whole range the engine supports.
        for step in 0..=(22 * 4) {
            let zoom = step as f64 / 4.0;

            for pair in RoadClass::ALL.windows(2) {
                let (lower, higher) = (pair[0], pair[1]);
                assert!(
                    lower.width_at(zoom) <= higher.width_at(zoom),
                    "{:?} is thicker than {:?} at zoom {}",
                    lower,
                    higher,
                    zoom
                );
            }
        }
    }

    #[test]
    fn test_only_secondary_roads_use_secondary_color() {
        for class in RoadClass::ALL {
            let expected = if class == RoadClass::Secondary {
                RoadColor::Secondary
            } else {
                RoadColor::Primary
            };
            assert_eq!(class.color(), expected);
        }
    }

    #[test]
    fn test_filters_match_their_classes() {
        assert!(RoadClass::Service.filter().matches("track"));
        assert!(RoadClass::Minor.filter().matches("living_street"));
        assert!(RoadClass::Motorway.filter().matches("motorway"));
        assert!(!RoadClass::Motorway.filter().matches("trunk"));
    }
}
