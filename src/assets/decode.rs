use std::sync::Arc;

use crate::assets::{LayerImage, LayerStack};
use crate::foundation::error::{KnobError, KnobResult};

/// Parse an SVG document held in memory.
pub fn parse_svg(text: &str) -> KnobResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_str(text, &opts)
        .map_err(|e| KnobError::decode(format!("parse svg document: {e}")))
}

/// Rasterize an SVG tree into premultiplied RGBA8 at exactly `width` x
/// `height`, scaling the document to fill the target.
///
/// Layers are rasterized at the size they will be drawn at, which replaces
/// decode-then-stretch and keeps upscaled skins crisp.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> KnobResult<Vec<u8>> {
    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(KnobError::decode("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| KnobError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Decode one optional layer at the target surface size.
///
/// An absent source yields `None`, never an error; a malformed source is a
/// hard decode failure.
pub(crate) fn decode_layer(
    svg: Option<&str>,
    width: u32,
    height: u32,
) -> KnobResult<Option<LayerImage>> {
    let Some(text) = svg else {
        return Ok(None);
    };

    let tree = parse_svg(text)?;
    let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    Ok(Some(premul_bytes_to_layer(&rgba8_premul, width, height)?))
}

/// Decode the full stack, joining the three layer decodes in parallel.
///
/// Any single failure fails the whole stack; a partially-decoded stack is
/// never returned.
pub(crate) fn decode_stack(
    background_svg: Option<&str>,
    track_svg: Option<&str>,
    handle_svg: Option<&str>,
    width: u32,
    height: u32,
) -> KnobResult<LayerStack> {
    let ((background, track), handle) = rayon::join(
        || {
            rayon::join(
                || decode_layer(background_svg, width, height),
                || decode_layer(track_svg, width, height),
            )
        },
        || decode_layer(handle_svg, width, height),
    );

    Ok(LayerStack {
        background: background?,
        track: track?,
        handle: handle?,
    })
}

fn premul_bytes_to_layer(rgba8_premul: &[u8], width: u32, height: u32) -> KnobResult<LayerImage> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KnobError::render("layer width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KnobError::render("layer height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(KnobError::render("layer raster byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(LayerImage {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        width: w,
        height: h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"><rect width="2" height="2" fill="#ff0000"/></svg>"##;

    #[test]
    fn svg_parse_ok_and_err() {
        parse_svg(RED_SQUARE).unwrap();
        assert!(matches!(parse_svg("<svg"), Err(KnobError::Decode(_))));
    }

    #[test]
    fn rasterize_scales_to_target_and_premultiplies() {
        let tree = parse_svg(RED_SQUARE).unwrap();
        let bytes = rasterize_svg_to_premul_rgba8(&tree, 4, 4).unwrap();
        assert_eq!(bytes.len(), 4 * 4 * 4);
        for px in bytes.chunks_exact(4) {
            assert_eq!(px, &[255, 0, 0, 255]);
        }
    }

    #[test]
    fn absent_layer_is_none_not_error() {
        assert!(decode_layer(None, 4, 4).unwrap().is_none());
    }

    #[test]
    fn stack_decode_fails_as_a_whole() {
        let err = decode_stack(Some(RED_SQUARE), Some("<svg"), None, 4, 4);
        assert!(matches!(err, Err(KnobError::Decode(_))));
    }

    #[test]
    fn stack_preserves_layer_correspondence() {
        let stack = decode_stack(None, Some(RED_SQUARE), None, 4, 4).unwrap();
        assert!(stack.background.is_none());
        assert!(stack.track.is_some());
        assert!(stack.handle.is_none());
        assert!(!stack.is_empty());
        assert!(LayerStack::default().is_empty());
    }
}
