//! Knobstack renders skinnable rotary controls ("knobs") for audio UIs.
//!
//! A knob skin is a stack of up to three SVG layers (background, track,
//! handle) composited per frame onto a CPU raster surface:
//!
//! 1. **Decode**: each supplied layer is parsed and rasterized once, at the
//!    surface's pixel size ([`KnobRenderer::create`])
//! 2. **Map**: the current percentage reading becomes a signed rotation
//!    offset over the configured angular range ([`AngleBounds`])
//! 3. **Composite**: background, arc-clipped track, and rotated handle are
//!    repainted from scratch ([`KnobRenderer::draw`])
//! 4. **Schedule** (optional): [`KnobRenderer::update`] parks a reading for
//!    the host's next frame tick, coalescing to the latest value
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Stateless draws**: the renderer never retains the last-drawn reading;
//!   every draw is a full recomputation, so equal readings produce
//!   byte-identical pixels.
//! - **All-or-nothing construction**: a renderer only exists once every
//!   supplied layer decoded; one malformed layer fails the whole factory.
//! - **Premultiplied RGBA8** end-to-end on the [`Surface`].
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod render;
mod renderer;

pub use assets::decode::{parse_svg, rasterize_svg_to_premul_rgba8};
pub use assets::{LayerImage, LayerStack};
pub use foundation::angle::AngleBounds;
pub use foundation::error::{KnobError, KnobResult};
pub use render::compositor::TrackMode;
pub use render::scheduler::FrameScheduler;
pub use render::surface::Surface;
pub use renderer::{KnobRenderer, KnobStyle};
