//! Ink engine used when the host platform has no native ink manager.
//!
//! Collects raw pointer points per stroke and smooths them into cubic
//! Bezier segments. Recognition and line selection are host-only and come
//! back empty.

use tracing::debug;

use crate::color::Color;
use crate::config::InkConfig;
use crate::engine::{InkEngine, ManipulationMode};
use crate::stroke::{DrawingAttributes, RecognitionResult, RenderingSegment, Stroke};
use crate::{Point, PointerPoint, Rect};

struct PendingStroke {
    points: Vec<Point>,
    attributes: DrawingAttributes,
}

pub struct FallbackInk {
    defaults: DrawingAttributes,
    min_width: f64,
    min_distance: f64,
    pending: Option<PendingStroke>,
    strokes: Vec<Stroke>,
}

impl FallbackInk {
    pub fn new(config: &InkConfig) -> Self {
        Self {
            defaults: DrawingAttributes {
                stroke_width: config.line_width,
                fit_to_curve: config.fit_to_curve,
                ..DrawingAttributes::default()
            },
            min_width: config.min_width,
            min_distance: config.min_distance,
            pending: None,
            strokes: Vec::new(),
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.pending.is_some()
    }
}

impl InkEngine for FallbackInk {
    fn begin_stroke(&mut self, point: PointerPoint) {
        let mut attributes = self.defaults;
        attributes.stroke_width = attributes.stroke_width.max(self.min_width);
        debug!(
            width = attributes.stroke_width,
            color = %attributes.color,
            "fallback stroke started"
        );
        self.pending = Some(PendingStroke {
            points: vec![point.position],
            attributes,
        });
    }

    fn extend_stroke(&mut self, point: PointerPoint) {
        let Some(pending) = self.pending.as_mut() else {
            debug!("fallback update without an active stroke");
            return;
        };
        if let Some(last) = pending.points.last() {
            if last.distance(point.position) < self.min_distance {
                return;
            }
        }
        pending.points.push(point.position);
    }

    fn end_stroke(&mut self, point: PointerPoint) -> Option<Rect> {
        let PendingStroke {
            mut points,
            attributes,
        } = self.pending.take()?;
        if points.last() != Some(&point.position) {
            points.push(point.position);
        }
        let stroke = Stroke::new(
            smooth_segments(&points, attributes.fit_to_curve),
            attributes,
        );
        let bounds = stroke.bounding_rect();
        debug!(points = points.len(), "fallback stroke committed");
        self.strokes.push(stroke);
        bounds
    }

    fn strokes(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }

    fn recognition_results(&self) -> Vec<RecognitionResult> {
        Vec::new()
    }

    fn set_default_attributes(&mut self, attributes: &DrawingAttributes) {
        self.defaults = *attributes;
    }

    fn default_attributes(&self) -> DrawingAttributes {
        self.defaults
    }

    fn select_with_line(&mut self, _from: Point, _to: Point) -> Option<Rect> {
        None
    }

    fn mode(&self) -> ManipulationMode {
        ManipulationMode::Inking
    }

    fn recolor_last_stroke(&mut self, color: Color) -> bool {
        match self.strokes.last_mut() {
            Some(stroke) if stroke.attributes.color != color => {
                stroke.attributes.color = color;
                true
            }
            _ => false,
        }
    }
}

fn lerp(from: Point, to: Point, t: f64) -> Point {
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}

/// Converts raw points into rendering segments.
///
/// With `fit_to_curve` the points are joined by a Catmull-Rom spline
/// expressed as cubic Beziers; otherwise each piece is a straight line
/// with control points on the chord. A lone point becomes a degenerate
/// curve so it still renders as a dot.
pub fn smooth_segments(points: &[Point], fit_to_curve: bool) -> Vec<RenderingSegment> {
    let Some(first) = points.first().copied() else {
        return Vec::new();
    };
    let mut segments = Vec::with_capacity(points.len().max(2));
    segments.push(RenderingSegment::Start(first));
    if points.len() == 1 {
        segments.push(RenderingSegment::Bezier {
            control_point1: first,
            control_point2: first,
            end: first,
        });
        return segments;
    }

    let last = points.len() - 1;
    for index in 0..last {
        let from = points[index];
        let to = points[index + 1];
        let (control_point1, control_point2) = if fit_to_curve {
            let before = points[index.saturating_sub(1)];
            let after = points[(index + 2).min(last)];
            (
                Point::new(
                    from.x + (to.x - before.x) / 6.0,
                    from.y + (to.y - before.y) / 6.0,
                ),
                Point::new(
                    to.x - (after.x - from.x) / 6.0,
                    to.y - (after.y - from.y) / 6.0,
                ),
            )
        } else {
            (lerp(from, to, 1.0 / 3.0), lerp(from, to, 2.0 / 3.0))
        };
        segments.push(RenderingSegment::Bezier {
            control_point1,
            control_point2,
            end: to,
        });
    }
    segments
}
