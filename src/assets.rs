pub mod decode;

/// One decoded skin layer, rasterized at the target surface size and ready to
/// be used as an image paint.
#[derive(Clone)]
pub struct LayerImage {
    pub(crate) paint: vello_cpu::Image,
    pub(crate) width: u16,
    pub(crate) height: u16,
}

/// The three optional layers of a knob skin.
///
/// Layers are independent: any subset may be present, and an absent layer is
/// simply never drawn. There is no exclusivity between them.
#[derive(Clone, Default)]
pub struct LayerStack {
    pub background: Option<LayerImage>,
    pub track: Option<LayerImage>,
    pub handle: Option<LayerImage>,
}

impl LayerStack {
    /// True when no layer is present; drawing then only clears the surface.
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.track.is_none() && self.handle.is_none()
    }
}
