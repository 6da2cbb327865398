use poster_core::{LatLng, Radius, get_theme_by_id, themes::Theme};

use derive_more::From;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
#[error("coordinates out of range: {lat}, {lng}")]
pub struct CoordinatesOutOfRangeError {
    pub lat: f64,
    pub lng: f64,
}

/// A position that is known to lie on the globe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Center(LatLng);

impl Center {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinatesOutOfRangeError> {
        let location = LatLng::new(lat, lng);
        if !location.is_valid() {
            return Err(CoordinatesOutOfRangeError { lat, lng });
        }

        Ok(Self(location))
    }

    pub fn location(&self) -> LatLng {
        self.0
    }
}

/// The fields required by the domain to compute a viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportRequest {
    center: Center,
    radius: Radius,
}

impl ViewportRequest {
    pub fn new(center: Center, radius: Radius) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> LatLng {
        self.center.location()
    }

    pub fn radius(&self) -> Radius {
        self.radius
    }
}

/// The fields required by the domain to generate a style document.
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub struct StyleRequest {
    theme_id: String,
}

impl StyleRequest {
    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    /// The requested theme, or the default one when the id is unknown.
    pub fn theme(&self) -> &'static Theme {
        get_theme_by_id(&self.theme_id)
    }
}
