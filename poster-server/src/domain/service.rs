/*!
   Module `service` provides the canonical implementation of the [PosterService] port.
*/

use poster_core::{StyleDocument, Viewport, generate_style, themes::THEMES, themes::Theme};

use tracing::{Level, event};

use super::{
    models::{StyleRequest, ViewportRequest},
    ports::{PosterMetrics, PosterService},
};

/// Canonical implementation of the [PosterService] port, through which the poster domain API is
/// consumed.
#[derive(Debug, Clone)]
pub struct Service<M>
where
    M: PosterMetrics,
{
    metrics: M,
}

impl<M> Service<M>
where
    M: PosterMetrics,
{
    pub fn new(metrics: M) -> Self {
        Self { metrics }
    }
}

impl<M> PosterService for Service<M>
where
    M: PosterMetrics,
{
    async fn themes(&self) -> Vec<&'static Theme> {
        THEMES.iter().collect()
    }

    /// Generate the [StyleDocument] of the theme named in `req`.
    async fn style(&self, req: &StyleRequest) -> StyleDocument {
        let theme = req.theme();

        if theme.id != req.theme_id() {
            event!(
                Level::WARN,
                "Unknown theme {}, serving {}",
                req.theme_id(),
                theme.id
            );
            self.metrics.record_unknown_theme(req.theme_id()).await;
        }

        let style = generate_style(theme);
        self.metrics.record_style_generated(theme.id).await;

        style
    }

    async fn viewport(&self, req: &ViewportRequest) -> Viewport {
        let viewport = Viewport::from_radius(req.center(), req.radius());
        self.metrics.record_viewport_computed().await;

        viewport
    }
}
