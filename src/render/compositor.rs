use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::Shape as _;

use crate::assets::{LayerImage, LayerStack};
use crate::foundation::angle::AngleBounds;
use crate::foundation::error::{KnobError, KnobResult};
use crate::render::surface::Surface;

/// How the track layer sweeps as the value moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrackMode {
    /// The track appears to deplete: the arc runs from the current reading to
    /// the upper angle bound.
    Clip,
    /// The track appears to accumulate: the arc runs from the lower angle
    /// bound to the current reading.
    #[default]
    Fill,
}

/// Paint the full stack for one reading.
///
/// Every draw is a clear-and-repaint from scratch on a fresh render context,
/// so no transform or clip state can leak between layers or between draw
/// calls; two draws with the same `delta` produce byte-identical pixels.
pub(crate) fn composite(
    surface: &mut Surface,
    layers: &LayerStack,
    bounds: &AngleBounds,
    mode: TrackMode,
    delta: f64,
) -> KnobResult<()> {
    surface.clear();

    let w = f64::from(surface.width());
    let h = f64::from(surface.height());
    let center = kurbo::Point::new(w / 2.0, h / 2.0);

    let mut ctx = vello_cpu::RenderContext::new(surface.width_u16(), surface.height_u16());

    if let Some(background) = &layers.background {
        fill_surface(&mut ctx, surface, background, kurbo::Affine::IDENTITY)?;
    }

    if let Some(track) = &layers.track {
        ensure_layer_size(surface, track)?;
        let (start, end) = track_span(mode, bounds, delta);
        // Radius 2x the surface height guarantees the wedge covers every
        // corner regardless of aspect ratio.
        let wedge = wedge_path(center, h * 2.0, start, end);

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(track.paint.clone());
        ctx.fill_path(&bezpath_to_cpu(&wedge));
    }

    if let Some(handle) = &layers.handle {
        fill_surface(
            &mut ctx,
            surface,
            handle,
            kurbo::Affine::rotate_about(-delta, center),
        )?;
    }

    ctx.flush();
    ctx.render_to_pixmap(surface.pixmap_mut());
    Ok(())
}

/// Arc span `(start, end)` of the track wedge for the current reading.
pub(crate) fn track_span(mode: TrackMode, bounds: &AngleBounds, delta: f64) -> (f64, f64) {
    let cursor = -delta - FRAC_PI_2;
    match mode {
        TrackMode::Clip => (cursor, bounds.max_rad),
        TrackMode::Fill => (bounds.min_rad, cursor),
    }
}

/// Angular sweep of a canvas-style arc drawn clockwise on a y-down surface.
///
/// A raw difference of 2π or more is a full circle; otherwise the sweep wraps
/// into [0, 2π), so an end angle behind the start goes the long way around.
pub(crate) fn canvas_sweep(start: f64, end: f64) -> f64 {
    let raw = end - start;
    if raw >= 2.0 * PI {
        2.0 * PI
    } else {
        raw.rem_euclid(2.0 * PI)
    }
}

/// Wedge bounded by the arc from `start` to `end` plus a straight closing
/// segment back to the center. A zero sweep yields a zero-area path that
/// fills nothing.
pub(crate) fn wedge_path(
    center: kurbo::Point,
    radius: f64,
    start: f64,
    end: f64,
) -> kurbo::BezPath {
    let sweep = canvas_sweep(start, end);
    let arc = kurbo::Arc::new(center, (radius, radius), start, sweep, 0.0);
    let mut path = arc.to_path(0.1);
    path.line_to(center);
    path.close_path();
    path
}

fn fill_surface(
    ctx: &mut vello_cpu::RenderContext,
    surface: &Surface,
    layer: &LayerImage,
    transform: kurbo::Affine,
) -> KnobResult<()> {
    ensure_layer_size(surface, layer)?;

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(layer.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(layer.width),
        f64::from(layer.height),
    ));
    Ok(())
}

fn ensure_layer_size(surface: &Surface, layer: &LayerImage) -> KnobResult<()> {
    if layer.width != surface.width_u16() || layer.height != surface.height_u16() {
        return Err(KnobError::render(format!(
            "layer raster {}x{} does not match surface {}x{}",
            layer.width,
            layer.height,
            surface.width(),
            surface.height()
        )));
    }
    Ok(())
}

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use kurbo::Shape as _;

    use super::*;

    fn bounds_0_270() -> AngleBounds {
        AngleBounds::from_degrees(0.0, 270.0).unwrap()
    }

    #[test]
    fn clip_and_fill_spans_are_complementary() {
        let bounds = bounds_0_270();
        let delta = bounds.delta(30.0);
        let cursor = -delta - FRAC_PI_2;

        assert_eq!(track_span(TrackMode::Clip, &bounds, delta), (cursor, bounds.max_rad));
        assert_eq!(track_span(TrackMode::Fill, &bounds, delta), (bounds.min_rad, cursor));
    }

    #[test]
    fn fill_span_at_midpoint_matches_reference_scenario() {
        // {min: 0, max: 270, Fill} at 50%: delta 0, arc [min_rad, -pi/2].
        let bounds = bounds_0_270();
        let (start, end) = track_span(TrackMode::Fill, &bounds, bounds.delta(50.0));
        assert_eq!(start, bounds.min_rad);
        assert!((end - (-FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn sweep_follows_canvas_arc_semantics() {
        assert_eq!(canvas_sweep(0.0, 0.0), 0.0);
        assert!((canvas_sweep(0.0, PI) - PI).abs() < 1e-12);
        // End behind start wraps the long way around.
        assert!((canvas_sweep(0.0, -FRAC_PI_2) - 1.5 * PI).abs() < 1e-12);
        // A raw difference of >= 2 pi is a full circle.
        assert_eq!(canvas_sweep(0.0, 3.0 * PI), 2.0 * PI);
    }

    #[test]
    fn zero_sweep_wedge_has_no_area() {
        let center = kurbo::Point::new(8.0, 8.0);
        let path = wedge_path(center, 32.0, -FRAC_PI_2, -FRAC_PI_2);
        assert!(path.area().abs() < 1e-9);
    }

    #[test]
    fn quarter_sweep_wedge_area_is_a_quarter_disc() {
        let center = kurbo::Point::new(0.0, 0.0);
        let r = 10.0;
        let path = wedge_path(center, r, 0.0, FRAC_PI_2);
        let expected = PI * r * r / 4.0;
        assert!((path.area().abs() - expected).abs() / expected < 0.01);
    }

    #[test]
    fn empty_stack_draw_clears_the_surface() {
        let mut surface = Surface::new(8, 8).unwrap();
        surface.pixmap_mut().data_as_u8_slice_mut().fill(127);

        let layers = LayerStack::default();
        composite(&mut surface, &layers, &bounds_0_270(), TrackMode::Fill, 0.0).unwrap();
        assert!(surface.data().iter().all(|&b| b == 0));
    }
}
