use crate::{StyleDocument, Viewport};

use std::{
    io::Cursor,
    sync::{Mutex, PoisonError},
};

use anyhow::Context;
use image::ImageReader;
use tokio::sync::oneshot;
use tracing::{Level, event};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceEvent {
    /// The style and its first tiles finished loading.
    Load,
    /// Nothing is loading or animating anymore.
    Idle,
    /// A frame was painted.
    Render,
}

/// A map rendering engine that draws a style document at a viewport.
///
/// Event subscriptions are single shot: the receiver resolves the next time the event fires and
/// the surface forgets about it afterwards.
pub trait RenderSurface: Send + Sync {
    fn set_style(&self, style: &StyleDocument);

    fn set_viewport(&self, viewport: Viewport);

    fn is_style_loaded(&self) -> bool;

    fn once(&self, event: SurfaceEvent) -> oneshot::Receiver<()>;

    fn trigger_repaint(&self);

    /// Reads the last painted frame back as an encoded raster.
    fn read_raster(&self) -> anyhow::Result<Vec<u8>>;

    fn dimensions(&self) -> (u32, u32);
}

/// A surface showing a frame that was rendered elsewhere.
///
/// Its style is always loaded and every repaint paints the same frame straight away.
pub struct StillSurface {
    raster: Vec<u8>,
    width: u32,
    height: u32,
    pending_renders: Mutex<Vec<oneshot::Sender<()>>>,
    style_name: Mutex<Option<String>>,
    viewport: Mutex<Option<Viewport>>,
}

impl StillSurface {
    pub fn from_encoded(raster: Vec<u8>) -> anyhow::Result<Self> {
        let (width, height) = ImageReader::new(Cursor::new(raster.as_slice()))
            .with_guessed_format()
            .context("Failed to read captured raster")?
            .into_dimensions()
            .context("Captured raster is not a supported image")?;

        event!(Level::DEBUG, "Still surface of {}x{}", width, height);

        Ok(StillSurface {
            raster,
            width,
            height,
            pending_renders: Mutex::new(Vec::new()),
            style_name: Mutex::new(None),
            viewport: Mutex::new(None),
        })
    }

    pub fn style_name(&self) -> Option<String> {
        self.style_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        *self.viewport.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSurface for StillSurface {
    fn set_style(&self, style: &StyleDocument) {
        *self.style_name.lock().unwrap_or_else(PoisonError::into_inner) = Some(style.name.clone());
    }

    fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.lock().unwrap_or_else(PoisonError::into_inner) = Some(viewport);
    }

    fn is_style_loaded(&self) -> bool {
        true
    }

    fn once(&self, event: SurfaceEvent) -> oneshot::Receiver<()> {
        let (sender, receiver) = oneshot::channel();

        match event {
            SurfaceEvent::Load | SurfaceEvent::Idle => {
                let _ = sender.send(());
            }
            SurfaceEvent::Render => self
                .pending_renders
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sender),
        }

        receiver
    }

    fn trigger_repaint(&self) {
        let pending = std::mem::take(
            &mut *self
                .pending_renders
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        for sender in pending {
            let _ = sender.send(());
        }
    }

    fn read_raster(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.raster.clone())
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
