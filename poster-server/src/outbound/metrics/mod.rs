use crate::domain::ports::PosterMetrics;

#[derive(Debug, Clone)]
pub struct NullMetrics;

impl PosterMetrics for NullMetrics {
    async fn record_style_generated(&self, _theme_id: &str) {}

    async fn record_unknown_theme(&self, _theme_id: &str) {}

    async fn record_viewport_computed(&self) {}
}
