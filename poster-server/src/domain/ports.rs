/*
   Module `ports` specifies the API by which external modules interact with the poster domain.

   All traits are bounded by `Send + Sync + 'static`, since their implementations must be shareable
   between request-handling threads.

   Trait methods are explicitly asynchronous, including `Send` bounds on response types,
   since the application is expected to always run in a multithreaded environment.
*/

use std::future::Future;

use poster_core::{StyleDocument, Viewport, themes::Theme};

use crate::domain::models::*;

/// `PosterService` is the public API for the poster domain.
///
/// It hands a map rendering engine everything it needs to draw a poster: the theme catalog, the
/// style document of a theme and the viewport of a location. Posters themselves are composited
/// next to the engine, never here.
pub trait PosterService: Clone + Send + Sync + 'static {
    /// Every theme, in catalog order.
    fn themes(&self) -> impl Future<Output = Vec<&'static Theme>> + Send;

    /// The style document of the requested theme. Unknown themes get the default style.
    fn style(&self, req: &StyleRequest) -> impl Future<Output = StyleDocument> + Send;

    /// The camera position for a location and radius.
    fn viewport(&self, req: &ViewportRequest) -> impl Future<Output = Viewport> + Send;
}

/// `PosterMetrics` describes an aggregator of poster related metrics, such as a time-series
/// database.
pub trait PosterMetrics: Send + Sync + Clone + 'static {
    /// Record a generated style document.
    fn record_style_generated(&self, theme_id: &str) -> impl Future<Output = ()> + Send;

    /// Record a request for an unknown theme.
    fn record_unknown_theme(&self, theme_id: &str) -> impl Future<Output = ()> + Send;

    /// Record a computed viewport.
    fn record_viewport_computed(&self) -> impl Future<Output = ()> + Send;
}
