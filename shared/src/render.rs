use crate::color::{encode_hex, Color};
use crate::stroke::{RenderingSegment, Stroke};
use crate::surface::Surface;

/// Replays one stroke's segments as a single stroked path.
///
/// Surface state touched here is bracketed by save/restore.
pub fn render_stroke<S: Surface + ?Sized>(
    surface: &mut S,
    segments: &[RenderingSegment],
    color: Color,
    width: f64,
) {
    if segments.is_empty() {
        return;
    }
    surface.save();
    surface.begin_path();
    surface.set_stroke_style(&encode_hex(color));
    surface.set_line_width(width);

    let mut first = true;
    for segment in segments {
        match segment {
            RenderingSegment::Start(point) => surface.move_to(*point),
            RenderingSegment::Bezier {
                control_point1,
                control_point2,
                end,
            } => {
                if first {
                    surface.move_to(*end);
                } else {
                    surface.bezier_curve_to(*control_point1, *control_point2, *end);
                }
            }
        }
        first = false;
    }

    surface.stroke();
    surface.close_path();
    surface.restore();
}

/// Clears the whole surface and redraws every stroke with its own attributes.
pub fn render_all<S: Surface + ?Sized>(surface: &mut S, strokes: &[Stroke]) {
    surface.clear();
    for stroke in strokes {
        render_stroke(
            surface,
            &stroke.segments,
            stroke.attributes.color,
            stroke.attributes.stroke_width,
        );
    }
}
