use crate::types::LatLng;

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

/// Queries shorter than this are not sent to the geocoder.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_CANDIDATES: usize = 5;

/// A place the user can pick as the poster location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceCandidate {
    pub display_name: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub location: LatLng,
}

/// A search result as returned by a Nominatim compatible service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NominatimPlace {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error(r#"invalid coordinate "{0}""#)]
    InvalidCoordinate(String),
    #[error("coordinates out of range: {lat}, {lng}")]
    OutOfRange { lat: String, lng: String },
}

impl PlaceCandidate {
    pub fn from_nominatim(place: &NominatimPlace) -> Result<Self, GeocodeError> {
        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidCoordinate(value.to_string()))
        };

        let location = LatLng::new(parse(&place.lat)?, parse(&place.lon)?);
        if !location.is_valid() {
            return Err(GeocodeError::OutOfRange {
                lat: place.lat.clone(),
                lng: place.lon.clone(),
            });
        }

        let address = place.address.clone().unwrap_or_default();

        let city = first_present([
            &address.city,
            &address.town,
            &address.village,
            &address.municipality,
        ])
        .unwrap_or_else(|| {
            place
                .display_name
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        });
        let region = first_present([&address.state, &address.county]).unwrap_or_default();
        let country = first_present([&address.country]).unwrap_or_default();

        Ok(PlaceCandidate {
            display_name: place.display_name.clone(),
            city,
            region,
            country,
            location,
        })
    }
}

fn first_present<const N: usize>(fields: [&Option<String>; N]) -> Option<String> {
    fields
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .cloned()
}

/// Looks places up by name.
pub trait Geocoder: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<PlaceCandidate>>> + Send;
}

/// Searches `geocoder` unless the query is too short, keeping at most [MAX_CANDIDATES] results.
pub async fn search_places<G: Geocoder>(
    geocoder: &G,
    query: &str,
) -> anyhow::Result<Vec<PlaceCandidate>> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Vec::new());
    }

    let mut candidates = geocoder.search(query).await?;
    candidates.truncate(MAX_CANDIDATES);

    event!(
        Level::DEBUG,
        "Found {} places for {:?}",
        candidates.len(),
        query
    );

    Ok(candidates)
}
