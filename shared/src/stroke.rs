use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::{Point, Rect};

pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;

/// Style applied to newly started strokes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DrawingAttributes {
    pub color: Color,
    pub stroke_width: f64,
    pub fit_to_curve: bool,
}

impl Default for DrawingAttributes {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            fit_to_curve: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum RenderingSegment {
    Start(Point),
    Bezier {
        control_point1: Point,
        control_point2: Point,
        end: Point,
    },
}

impl RenderingSegment {
    pub fn position(&self) -> Point {
        match self {
            RenderingSegment::Start(point) => *point,
            RenderingSegment::Bezier { end, .. } => *end,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub segments: Vec<RenderingSegment>,
    pub attributes: DrawingAttributes,
    pub selected: bool,
}

impl Stroke {
    pub fn new(segments: Vec<RenderingSegment>, attributes: DrawingAttributes) -> Self {
        Self {
            segments,
            attributes,
            selected: false,
        }
    }

    /// Bounds of every segment point, control points included.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::from_points(self.segments.iter().flat_map(|segment| match segment {
            RenderingSegment::Start(point) => vec![*point],
            RenderingSegment::Bezier {
                control_point1,
                control_point2,
                end,
            } => vec![*control_point1, *control_point2, *end],
        }))
    }
}

/// Handwriting candidate produced by the host engine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecognitionResult {
    pub bounding_rect: Rect,
    pub candidates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_rect_includes_control_points() {
        let stroke = Stroke::new(
            vec![
                RenderingSegment::Start(Point::new(0.0, 0.0)),
                RenderingSegment::Bezier {
                    control_point1: Point::new(5.0, -4.0),
                    control_point2: Point::new(8.0, 12.0),
                    end: Point::new(10.0, 10.0),
                },
            ],
            DrawingAttributes::default(),
        );
        assert_eq!(
            stroke.bounding_rect(),
            Some(Rect::new(0.0, -4.0, 10.0, 16.0))
        );
    }

    #[test]
    fn test_empty_stroke_has_no_bounds() {
        let stroke = Stroke::new(Vec::new(), DrawingAttributes::default());
        assert_eq!(stroke.bounding_rect(), None);
    }
}
