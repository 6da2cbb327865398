use super::AppState;
use super::api::{ApiError, ApiSuccess};
use crate::domain::models::{Center, CoordinatesOutOfRangeError, StyleRequest, ViewportRequest};
use crate::domain::ports::PosterService;

use poster_core::{Radius, RadiusOutOfRangeError, StyleDocument, Viewport, themes::Theme};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub(super) enum ParseViewportHttpRequestError {
    #[error(transparent)]
    Coordinates(#[from] CoordinatesOutOfRangeError),
    #[error(transparent)]
    Radius(#[from] RadiusOutOfRangeError),
}

/// The query of a viewport request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportHttpRequestQuery {
    lat: f64,
    lng: f64,
    radius: u32,
}

impl ViewportHttpRequestQuery {
    /// Converts the HTTP request query into a domain request.
    fn try_into_domain(self) -> Result<ViewportRequest, ParseViewportHttpRequestError> {
        let center = Center::new(self.lat, self.lng)?;
        let radius = Radius::new(self.radius)?;

        Ok(ViewportRequest::new(center, radius))
    }
}

/// List every [Theme].
///
/// # Responses
///
/// - 200 OK: the theme catalog.
pub(super) async fn list_themes_handler<PS: PosterService>(
    State(state): State<AppState<PS>>,
) -> Result<ApiSuccess<Vec<&'static Theme>>, ApiError> {
    let themes = state.poster_service.themes().await;

    Ok(ApiSuccess::new(StatusCode::OK, themes))
}

/// Get the [StyleDocument] of a theme.
///
/// # Responses
///
/// - 200 OK: the style of the theme, or of the default theme for an unknown id.
pub(super) async fn get_style_handler<PS: PosterService>(
    State(state): State<AppState<PS>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<StyleDocument>, ApiError> {
    let style = state.poster_service.style(&StyleRequest::from(id)).await;

    Ok(ApiSuccess::new(StatusCode::OK, style))
}

/// Compute the [Viewport] of a location and radius.
///
/// # Responses
///
/// - 200 OK: the viewport.
/// - 422 Unprocessable entity: the coordinates or the radius are out of range.
pub(super) async fn get_viewport_handler<PS: PosterService>(
    State(state): State<AppState<PS>>,
    Query(query): Query<ViewportHttpRequestQuery>,
) -> Result<ApiSuccess<Viewport>, ApiError> {
    let domain_req = query.try_into_domain()?;
    let viewport = state.poster_service.viewport(&domain_req).await;

    Ok(ApiSuccess::new(StatusCode::OK, viewport))
}
