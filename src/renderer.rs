use crate::assets::LayerStack;
use crate::assets::decode::decode_stack;
use crate::foundation::angle::AngleBounds;
use crate::foundation::error::{KnobError, KnobResult};
use crate::render::compositor::{self, TrackMode};
use crate::render::scheduler::FrameScheduler;
use crate::render::surface::Surface;

/// Skin and travel configuration for one knob.
///
/// The three SVG sources are independent and all optional; the degree bounds
/// define the control's rotation range. Immutable once handed to
/// [`KnobRenderer::create`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct KnobStyle {
    #[serde(default)]
    pub background_svg: Option<String>,
    #[serde(default)]
    pub track_svg: Option<String>,
    #[serde(default)]
    pub handle_svg: Option<String>,
    pub min_degrees: f64,
    pub max_degrees: f64,
    #[serde(default)]
    pub track_mode: TrackMode,
}

impl KnobStyle {
    /// Load a style from its JSON form.
    pub fn from_json_str(json: &str) -> KnobResult<Self> {
        serde_json::from_str(json).map_err(|e| KnobError::serde(e.to_string()))
    }
}

/// Renders a layered knob skin onto a caller-owned [`Surface`].
///
/// Construction is two-phase: the surface validates itself synchronously at
/// allocation, then [`KnobRenderer::create`] resolves every layer before a
/// renderer exists at all; there is no window where a renderer can be asked
/// to draw with assets still loading. The renderer is bound to the pixel size
/// of the surface it was created against.
pub struct KnobRenderer {
    bounds: AngleBounds,
    track_mode: TrackMode,
    layers: LayerStack,
    scheduler: FrameScheduler,
    width: u32,
    height: u32,
}

impl KnobRenderer {
    /// Decode the style's layers at the surface's size and build a renderer.
    ///
    /// Fails if the angle bounds are non-finite or any supplied SVG source
    /// fails to decode; a partially-loaded renderer is never returned.
    #[tracing::instrument(skip(surface, style))]
    pub fn create(surface: &Surface, style: &KnobStyle) -> KnobResult<Self> {
        let bounds = AngleBounds::from_degrees(style.min_degrees, style.max_degrees)?;
        let layers = decode_stack(
            style.background_svg.as_deref(),
            style.track_svg.as_deref(),
            style.handle_svg.as_deref(),
            surface.width(),
            surface.height(),
        )?;

        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            background = layers.background.is_some(),
            track = layers.track.is_some(),
            handle = layers.handle.is_some(),
            "knob renderer ready"
        );

        Ok(Self {
            bounds,
            track_mode: style.track_mode,
            layers,
            scheduler: FrameScheduler::new(),
            width: surface.width(),
            height: surface.height(),
        })
    }

    /// Cached angle bounds, fixed for the renderer's lifetime.
    pub fn bounds(&self) -> AngleBounds {
        self.bounds
    }

    /// Signed rotation offset for a reading; see [`AngleBounds::delta`].
    pub fn delta(&self, percentage: f64) -> f64 {
        self.bounds.delta(percentage)
    }

    /// Draw synchronously, for hosts that run their own frame scheduling.
    ///
    /// The last-drawn percentage is never retained: every draw is a full
    /// repaint from the supplied value.
    #[tracing::instrument(skip(self, surface))]
    pub fn draw(&self, surface: &mut Surface, percentage: f64) -> KnobResult<()> {
        self.ensure_surface(surface)?;
        compositor::composite(
            surface,
            &self.layers,
            &self.bounds,
            self.track_mode,
            self.bounds.delta(percentage),
        )
    }

    /// Queue a redraw for the next frame tick; never draws synchronously.
    ///
    /// Multiple updates between ticks coalesce to the latest percentage.
    pub fn update(&mut self, percentage: f64) {
        self.scheduler.request(percentage);
    }

    /// True when an [`update`](Self::update) is waiting for the next tick.
    pub fn has_pending_update(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Host frame tick: performs at most one queued draw.
    ///
    /// Returns whether a draw happened.
    pub fn on_frame(&mut self, surface: &mut Surface) -> KnobResult<bool> {
        match self.scheduler.take() {
            Some(percentage) => {
                self.draw(surface, percentage)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Release the renderer.
    ///
    /// Teardown is a move, so it can only happen once. Today it only drops
    /// the owned layer rasters; the hook is reserved for graphics resources
    /// that need explicit release.
    pub fn destroy(self) {}

    fn ensure_surface(&self, surface: &Surface) -> KnobResult<()> {
        if surface.width() != self.width || surface.height() != self.height {
            return Err(KnobError::render(format!(
                "renderer is bound to {}x{} but surface is {}x{}",
                self.width,
                self.height,
                surface.width(),
                surface.height()
            )));
        }
        Ok(())
    }
}
