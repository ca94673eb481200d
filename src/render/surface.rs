use crate::foundation::error::{KnobError, KnobResult};

/// A caller-owned 2D raster target.
///
/// The renderer draws into a surface during a draw call but never owns its
/// lifetime; hosts keep the surface and blit or encode its pixels after each
/// frame. Pixels are premultiplied RGBA8, row-major, tightly packed.
pub struct Surface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    /// Allocate a surface, validating the target synchronously.
    ///
    /// This is the fail-fast half of construction: dimension problems surface
    /// here, before any asset work starts.
    pub fn new(width: u32, height: u32) -> KnobResult<Self> {
        if width == 0 || height == 0 {
            return Err(KnobError::validation("surface dimensions must be non-zero"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| KnobError::validation("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| KnobError::validation("surface height exceeds u16"))?;

        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub(crate) fn width_u16(&self) -> u16 {
        self.width
    }

    pub(crate) fn height_u16(&self) -> u16 {
        self.height
    }

    /// Premultiplied RGBA8 readback of the last drawn frame.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Clear every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(Surface::new(0, 16).is_err());
        assert!(Surface::new(16, 0).is_err());
        assert!(Surface::new(70_000, 16).is_err());
    }

    #[test]
    fn starts_transparent_and_clears() {
        let mut s = Surface::new(3, 2).unwrap();
        assert_eq!(s.data().len(), 3 * 2 * 4);
        assert!(s.data().iter().all(|&b| b == 0));

        s.pixmap_mut().data_as_u8_slice_mut().fill(200);
        s.clear();
        assert!(s.data().iter().all(|&b| b == 0));
    }
}
