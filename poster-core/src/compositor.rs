/*!
   Module `compositor` drives a poster export from a live render surface to a finished artifact.

   An export waits for the surface style to settle, captures the next painted frame, composites it
   at the export resolution and encodes it. Progress is published on a watch channel and the
   compositor always ends up back in [ExportState::Idle], whether the export succeeded, failed or
   was dropped half way.
*/

use crate::{
    algos::{PosterDrawer, encode},
    constants::{DEFAULT_WAIT_TIMEOUT_SECS, MONOSPACE_FAMILIES, SANS_SERIF_FAMILIES},
    surface::{RenderSurface, SurfaceEvent},
    types::{ExportArtifact, ExportRequest},
};

use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use thiserror::Error;
use tokio::{
    sync::{Mutex, oneshot, watch},
    task::spawn_blocking,
    time::timeout,
};
use tracing::{Level, event};
use usvg::fontdb;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportState {
    Idle,
    AwaitingStyleReady,
    Capturing,
    Compositing,
    Encoding,
    Done,
    Failed,
}

/// The surface event an export was waiting on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WaitStage {
    StyleIdle,
    Render,
}

impl Display for WaitStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitStage::StyleIdle => write!(f, "style to finish loading"),
            WaitStage::Render => write!(f, "next frame"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("no render surface is attached")]
    SurfaceUnavailable,
    #[error("failed to capture the map: {0}")]
    CaptureFailed(String),
    #[error("failed to decode the captured map: {0}")]
    DecodeFailed(String),
    #[error("failed to composite the poster: {0}")]
    CompositeFailed(String),
    #[error("failed to encode the poster: {0}")]
    EncodeFailed(String),
    #[error("timed out waiting for the {stage}")]
    TimedOut { stage: WaitStage },
    #[error("another export is already in progress")]
    Busy,
}

impl ExportError {
    /// The message shown to the user. Details only go to the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::SurfaceUnavailable => "Map is not ready. Please wait and try again.",
            _ => "Failed to export poster. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// How long to wait for the surface style to load. `None` waits forever.
    pub idle_timeout: Option<Duration>,
    /// How long to wait for the frame requested by the capture. `None` waits forever.
    pub paint_timeout: Option<Duration>,
    pub load_system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            idle_timeout: Some(Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS)),
            paint_timeout: Some(Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS)),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

impl ExportConfig {
    pub fn font_database(&self) -> fontdb::Database {
        let mut database = fontdb::Database::new();

        if self.load_system_fonts {
            database.load_system_fonts();
        }
        for dir in self.font_dirs.iter() {
            database.load_fonts_dir(dir);
        }

        event!(Level::DEBUG, "Loaded {} font faces for labels", database.len());

        // The generic families default to faces that may not be installed, so point them at
        // loaded ones.
        let sans_serif = loaded_family(&database, &SANS_SERIF_FAMILIES, false);
        let monospace =
            loaded_family(&database, &MONOSPACE_FAMILIES, true).or_else(|| sans_serif.clone());

        match (sans_serif, monospace) {
            (Some(sans_serif), Some(monospace)) => {
                event!(Level::DEBUG, "Labels use {} and {}", sans_serif, monospace);
                database.set_sans_serif_family(sans_serif);
                database.set_monospace_family(monospace);
            }
            _ => event!(Level::WARN, "No font faces for labels, labelled posters will fail"),
        }

        database
    }
}

/// The first preferred family with a loaded face, else the family of any loaded face with the
/// requested spacing.
fn loaded_family(
    database: &fontdb::Database,
    preferred: &[&str],
    monospaced: bool,
) -> Option<String> {
    let has_family = |name: &str| {
        database
            .faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };

    preferred
        .iter()
        .copied()
        .find(|&name| has_family(name))
        .map(str::to_string)
        .or_else(|| {
            database
                .faces()
                .filter(|face| face.monospaced == monospaced)
                .find_map(|face| face.families.first())
                .map(|(family, _)| family.clone())
        })
}

pub struct Compositor {
    config: ExportConfig,
    drawer: Arc<PosterDrawer>,
    state: watch::Sender<ExportState>,
    in_flight: Mutex<()>,
}

// Puts the compositor back to idle when an export ends, including when its future is dropped.
struct ResetToIdle<'a>(&'a watch::Sender<ExportState>);

impl Drop for ResetToIdle<'_> {
    fn drop(&mut self) {
        self.0.send_replace(ExportState::Idle);
    }
}

impl Compositor {
    pub fn new(config: ExportConfig) -> Self {
        let drawer = Arc::new(PosterDrawer::new(config.font_database()));
        let (state, _) = watch::channel(ExportState::Idle);

        Compositor {
            config,
            drawer,
            state,
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn state(&self) -> ExportState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportState> {
        self.state.subscribe()
    }

    /// Captures the surface and produces the poster described by `request`.
    ///
    /// Only one export runs at a time: a call made while another is in flight fails with
    /// [ExportError::Busy] and leaves the running export alone.
    #[tracing::instrument(
        skip_all,
        fields(city = %request.city, theme = request.theme.id, format = %request.format)
    )]
    pub async fn export<S: RenderSurface + ?Sized>(
        &self,
        surface: Option<&S>,
        request: &ExportRequest,
    ) -> Result<ExportArtifact, ExportError> {
        let Ok(_in_flight) = self.in_flight.try_lock() else {
            event!(Level::WARN, "Export rejected, another export is in progress");
            return Err(ExportError::Busy);
        };
        let _reset = ResetToIdle(&self.state);

        let result = self.run(surface, request).await;

        match &result {
            Ok(artifact) => {
                self.state.send_replace(ExportState::Done);
                event!(
                    Level::INFO,
                    "Exported {} ({} bytes)",
                    artifact.filename,
                    artifact.bytes.len()
                );
            }
            Err(err) => {
                self.state.send_replace(ExportState::Failed);
                event!(Level::ERROR, "Export failed: {}", err);
            }
        }

        result
    }

    async fn run<S: RenderSurface + ?Sized>(
        &self,
        surface: Option<&S>,
        request: &ExportRequest,
    ) -> Result<ExportArtifact, ExportError> {
        let surface = surface.ok_or(ExportError::SurfaceUnavailable)?;

        self.state.send_replace(ExportState::AwaitingStyleReady);
        if !surface.is_style_loaded() {
            event!(Level::DEBUG, "Waiting for the map style to load");
            let idle = surface.once(SurfaceEvent::Idle);
            wait_for(idle, self.config.idle_timeout, WaitStage::StyleIdle).await?;
        }

        self.state.send_replace(ExportState::Capturing);
        let (surface_width, surface_height) = surface.dimensions();
        if surface_width == 0 || surface_height == 0 {
            return Err(ExportError::CaptureFailed(format!(
                "render surface is {}x{}",
                surface_width, surface_height
            )));
        }

        // Subscribe before repainting so the frame cannot be missed.
        let rendered = surface.once(SurfaceEvent::Render);
        surface.trigger_repaint();
        wait_for(rendered, self.config.paint_timeout, WaitStage::Render).await?;

        let captured = surface
            .read_raster()
            .map_err(|err| ExportError::CaptureFailed(format!("{:#}", err)))?;

        self.state.send_replace(ExportState::Compositing);
        let canvas = {
            let drawer = Arc::clone(&self.drawer);
            let request = request.clone();

            spawn_blocking(move || drawer.draw(&captured, &request))
                .await
                .map_err(|err| ExportError::CompositeFailed(err.to_string()))??
        };

        self.state.send_replace(ExportState::Encoding);
        let format = request.format;
        let bytes = spawn_blocking(move || encode(&canvas, format))
            .await
            .map_err(|err| ExportError::EncodeFailed(err.to_string()))??;

        let (width, height) = request.dimensions();

        Ok(ExportArtifact {
            width,
            height,
            bytes,
            mime_type: format.mime_type(),
            filename: request.filename(),
        })
    }
}

async fn wait_for(
    event: oneshot::Receiver<()>,
    limit: Option<Duration>,
    stage: WaitStage,
) -> Result<(), ExportError> {
    let received = match limit {
        Some(limit) => timeout(limit, event)
            .await
            .map_err(|_| ExportError::TimedOut { stage })?,
        None => event.await,
    };

    received.map_err(|_| {
        ExportError::CaptureFailed(format!("render surface went away waiting for the {}", stage))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        StyleDocument, Viewport,
        themes::get_theme_by_id,
        types::{AspectRatio, ExportFormat, LatLng},
    };

    use image::{ImageFormat, Rgba, RgbaImage};
    use std::{io::Cursor, sync::Mutex as StdMutex};

    fn capture() -> Vec<u8> {
        let image = RgbaImage::from_pixel(32, 24, Rgba([60, 60, 60, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn stockholm(format: ExportFormat, aspect_ratio: AspectRatio) -> ExportRequest {
        ExportRequest {
            city: String::from("Stockholm"),
            country: String::from("Sweden"),
            location: LatLng::new(59.329, 18.068),
            theme: get_theme_by_id("noir"),
            show_labels: false,
            format,
            aspect_ratio,
        }
    }

    fn compositor() -> Compositor {
        Compositor::new(ExportConfig {
            load_system_fonts: false,
            ..ExportConfig::default()
        })
    }

    fn compositor_with_fonts() -> Compositor {
        let config = ExportConfig::default();
        assert!(
            !config.font_database().is_empty(),
            "labelled posters need at least one installed font"
        );
        Compositor::new(config)
    }

    /// A surface whose events only fire when the test says so.
    struct ManualSurface {
        raster: Vec<u8>,
        loaded: bool,
        idle: StdMutex<Vec<oneshot::Sender<()>>>,
        render: StdMutex<Vec<oneshot::Sender<()>>>,
        paint_on_repaint: bool,
    }

    impl ManualSurface {
        fn new(raster: Vec<u8>) -> Self {
            ManualSurface {
                raster,
                loaded: true,
                idle: StdMutex::new(Vec::new()),
                render: StdMutex::new(Vec::new()),
                paint_on_repaint: true,
            }
        }

        fn fire(senders: &StdMutex<Vec<oneshot::Sender<()>>>) {
            for sender in senders.lock().unwrap().drain(..) {
                let _ = sender.send(());
            }
        }

        fn paint(&self) {
            Self::fire(&self.render);
        }
    }

    impl RenderSurface for ManualSurface {
        fn set_style(&self, _style: &StyleDocument) {}

        fn set_viewport(&self, _viewport: Viewport) {}

        fn is_style_loaded(&self) -> bool {
            self.loaded
        }

        fn once(&self, event: SurfaceEvent) -> oneshot::Receiver<()> {
            let (sender, receiver) = oneshot::channel();
            match event {
                SurfaceEvent::Load | SurfaceEvent::Idle => self.idle.lock().unwrap().push(sender),
                SurfaceEvent::Render => self.render.lock().unwrap().push(sender),
            }
            receiver
        }

        fn trigger_repaint(&self) {
            if self.paint_on_repaint {
                self.paint();
            }
        }

        fn read_raster(&self) -> anyhow::Result<Vec<u8>> {
            Ok(self.raster.clone())
        }

        fn dimensions(&self) -> (u32, u32) {
            (32, 24)
        }
    }

    #[test]
    fn test_generic_families_resolve_to_loaded_faces() {
        let database = ExportConfig::default().font_database();

        for family in [fontdb::Family::SansSerif, fontdb::Family::Monospace] {
            let query = fontdb::Query {
                families: &[family],
                ..fontdb::Query::default()
            };
            assert!(database.query(&query).is_some());
        }
    }

    #[test]
    fn test_no_fonts_leaves_generic_families_unresolved() {
        let database = ExportConfig {
            load_system_fonts: false,
            font_dirs: vec![PathBuf::from("/nonexistent/poster-fonts")],
            ..ExportConfig::default()
        }
        .font_database();

        assert!(database.is_empty());
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        assert!(database.query(&query).is_none());
    }

    #[tokio::test]
    async fn test_stockholm_poster() {
        let compositor = compositor_with_fonts();
        let surface = ManualSurface::new(capture());
        let mut request = stockholm(ExportFormat::Png, AspectRatio::Portrait);
        request.show_labels = true;

        let artifact = compositor.export(Some(&surface), &request).await.unwrap();

        assert_eq!((artifact.width, artifact.height), (2880, 3840));
        assert_eq!(artifact.filename, "stockholm-2880x3840.png");
        assert_eq!(artifact.mime_type, "image/png");

        let poster = image::load_from_memory(&artifact.bytes).unwrap().into_rgba8();
        assert_eq!(poster.dimensions(), (2880, 3840));

        let corner = poster.get_pixel(0, 0).0;
        assert!(corner[0] <= 2 && corner[1] <= 2 && corner[2] <= 2);
        assert_eq!(corner[3], 255);

        let center = poster.get_pixel(1440, 1920).0;
        assert!(center[0].abs_diff(60) <= 1);

        // The city line is centred on y = 3840 - 150 * 2.4 = 3480 in white, over a faded map
        // that is no brighter than the grey capture.
        let lit = |rows: std::ops::Range<u32>| {
            rows.flat_map(|y| (0..2880).map(move |x| (x, y)))
                .filter(|&(x, y)| poster.get_pixel(x, y).0[0] > 200)
                .count()
        };
        assert!(lit(3390..3570) > 1000, "city label is missing");
        assert_eq!(lit(1800..1980), 0);

        assert_eq!(compositor.state(), ExportState::Idle);

        // Same request and same capture give the same file.
        let again = compositor.export(Some(&surface), &request).await.unwrap();
        assert_eq!(again.bytes, artifact.bytes);
    }

    #[tokio::test]
    async fn test_jpeg_artifact() {
        let compositor = compositor();
        let surface = ManualSurface::new(capture());
        let mut request = stockholm(ExportFormat::Jpeg, AspectRatio::Widescreen);
        request.city = String::from("Cape Town");

        let artifact = compositor.export(Some(&surface), &request).await.unwrap();

        assert_eq!(artifact.filename, "cape-town-3840x2160.jpg");
        assert_eq!(artifact.mime_type, "image/jpeg");
        assert!(artifact.bytes.starts_with(&[0xFF, 0xD8]));
    }

    #[tokio::test]
    async fn test_labels_without_font_faces() {
        let compositor = compositor();
        let surface = ManualSurface::new(capture());
        let mut request = stockholm(ExportFormat::Png, AspectRatio::Portrait);
        request.show_labels = true;

        let err = compositor.export(Some(&surface), &request).await.unwrap_err();

        assert!(matches!(err, ExportError::CompositeFailed(_)));
        assert_eq!(err.user_message(), "Failed to export poster. Please try again.");
        assert_eq!(compositor.state(), ExportState::Idle);

        // The same poster without labels needs no font.
        request.show_labels = false;
        assert!(compositor.export(Some(&surface), &request).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_surface() {
        let compositor = compositor();
        let request = stockholm(ExportFormat::Png, AspectRatio::Square);

        let err = compositor
            .export::<ManualSurface>(None, &request)
            .await
            .unwrap_err();

        assert_eq!(err, ExportError::SurfaceUnavailable);
        assert_eq!(err.user_message(), "Map is not ready. Please wait and try again.");
        assert_eq!(compositor.state(), ExportState::Idle);
    }

    #[tokio::test]
    async fn test_undecodable_capture() {
        let compositor = compositor();
        let surface = ManualSurface::new(b"definitely not a png".to_vec());
        let request = stockholm(ExportFormat::Png, AspectRatio::Square);

        let err = compositor.export(Some(&surface), &request).await.unwrap_err();

        assert!(matches!(err, ExportError::DecodeFailed(_)));
        assert_eq!(err.user_message(), "Failed to export poster. Please try again.");
        assert_eq!(compositor.state(), ExportState::Idle);
    }

    #[tokio::test]
    async fn test_waits_for_style_before_capturing() {
        let compositor = compositor();
        let mut surface = ManualSurface::new(capture());
        surface.loaded = false;
        let request = stockholm(ExportFormat::Png, AspectRatio::Square);

        let mut states = compositor.subscribe();
        let export = compositor.export(Some(&surface), &request);

        let release = async {
            states
                .wait_for(|state| *state == ExportState::AwaitingStyleReady)
                .await
                .unwrap();
            ManualSurface::fire(&surface.idle);
        };

        let (artifact, _) = tokio::join!(export, release);
        assert_eq!(artifact.unwrap().width, 3840);
    }

    #[tokio::test]
    async fn test_second_export_is_rejected() {
        let compositor = compositor();
        let mut surface = ManualSurface::new(capture());
        surface.paint_on_repaint = false;
        let request = stockholm(ExportFormat::Png, AspectRatio::Portrait);

        let mut states = compositor.subscribe();
        let first = compositor.export(Some(&surface), &request);

        let second = async {
            states
                .wait_for(|state| *state == ExportState::Capturing)
                .await
                .unwrap();

            let result = compositor.export(Some(&surface), &request).await;
            surface.paint();
            result
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(second.unwrap_err(), ExportError::Busy);
        assert_eq!(first.unwrap().filename, "stockholm-2880x3840.png");
        assert_eq!(compositor.state(), ExportState::Idle);
    }

    #[tokio::test]
    async fn test_export_rejected_while_compositing() {
        let compositor = compositor();
        let surface = ManualSurface::new(capture());
        let request = stockholm(ExportFormat::Jpeg, AspectRatio::Square);

        let mut states = compositor.subscribe();
        let first = compositor.export(Some(&surface), &request);

        // The first export parks on the blocking draw while in Compositing.
        let second = async {
            states
                .wait_for(|state| *state == ExportState::Compositing)
                .await
                .unwrap();

            compositor.export(Some(&surface), &request).await
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(second.unwrap_err(), ExportError::Busy);
        assert_eq!(first.unwrap().filename, "stockholm-3840x3840.jpg");
        assert_eq!(compositor.state(), ExportState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_style_wait_times_out() {
        let compositor = Compositor::new(ExportConfig {
            idle_timeout: Some(Duration::from_secs(1)),
            load_system_fonts: false,
            ..ExportConfig::default()
        });
        let mut surface = ManualSurface::new(capture());
        surface.loaded = false;
        let request = stockholm(ExportFormat::Png, AspectRatio::Square);

        let err = compositor.export(Some(&surface), &request).await.unwrap_err();

        assert_eq!(
            err,
            ExportError::TimedOut {
                stage: WaitStage::StyleIdle
            }
        );
        assert_eq!(compositor.state(), ExportState::Idle);
    }

    #[tokio::test]
    async fn test_dropped_export_returns_to_idle() {
        let compositor = compositor();
        let mut surface = ManualSurface::new(capture());
        surface.paint_on_repaint = false;
        let request = stockholm(ExportFormat::Png, AspectRatio::Square);

        {
            let export = compositor.export(Some(&surface), &request);
            tokio::pin!(export);

            // Poll once so the export reaches the capture wait, then drop it.
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut export).await;
            assert!(polled.is_err());
            assert_eq!(compositor.state(), ExportState::Capturing);
        }

        assert_eq!(compositor.state(), ExportState::Idle);
    }
}
