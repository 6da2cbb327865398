use crate::{
    constants::{EARTH_CIRCUMFERENCE, MAX_ZOOM, MIN_ZOOM},
    types::{LatLng, Radius},
};

use serde::Serialize;

/// Converts a poster radius in meters into a web-mercator zoom level.
///
/// The result shrinks as the radius grows and saturates at [`MIN_ZOOM`] and
/// [`MAX_ZOOM`] instead of failing: a non-positive radius yields the closest
/// zoom, a NaN radius the widest one.
pub fn radius_to_zoom(radius_meters: f64) -> f64 {
    if radius_meters.is_nan() {
        return MIN_ZOOM;
    }
    if radius_meters <= 0.0 {
        return MAX_ZOOM;
    }

    let zoom = (EARTH_CIRCUMFERENCE / (radius_meters * 4.0)).log2() - 1.0;

    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Camera position handed to the map renderer. The zoom is always derived from
/// a radius, never set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Viewport {
    pub fn from_radius(center: LatLng, radius: Radius) -> Self {
        Viewport {
            center,
            zoom: radius_to_zoom(radius.meters() as f64),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zoom_decreases_with_radius() {
        let zooms: Vec<f64> = Radius::all()
            .map(|radius| radius_to_zoom(radius.meters() as f64))
            .collect();

        for pair in zooms.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        for zoom in zooms.iter() {
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(zoom));
        }

        assert!(radius_to_zoom(4_000.0) > radius_to_zoom(20_000.0));
    }

    #[test]
    fn test_zoom_formula() {
        // log2(40075016.686 / 40000) - 1
        let expected = (EARTH_CIRCUMFERENCE / 40_000.0).log2() - 1.0;
        assert!((radius_to_zoom(10_000.0) - expected).abs() < 1e-9);
        assert!((radius_to_zoom(10_000.0) - 8.968).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_saturates() {
        assert_eq!(radius_to_zoom(20_000.0), MIN_ZOOM);
        assert_eq!(radius_to_zoom(1_000_000.0), MIN_ZOOM);
        assert_eq!(radius_to_zoom(1.0), MAX_ZOOM);
        assert_eq!(radius_to_zoom(0.0), MAX_ZOOM);
        assert_eq!(radius_to_zoom(-5.0), MAX_ZOOM);
        assert_eq!(radius_to_zoom(f64::NAN), MIN_ZOOM);
        assert_eq!(radius_to_zoom(f64::INFINITY), MIN_ZOOM);
    }

    #[test]
    fn test_viewport_from_radius() {
        let center = LatLng::new(59.329, 18.068);
        let viewport = Viewport::from_radius(center, Radius::new(4_000).unwrap());

        assert_eq!(viewport.center, center);
        assert_eq!(viewport.zoom, radius_to_zoom(4_000.0));
    }
}
