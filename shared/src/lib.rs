use serde::{Deserialize, Serialize};

pub mod adapter;
pub mod color;
pub mod config;
pub mod engine;
pub mod fallback;
pub mod pipeline;
pub mod render;
pub mod stroke;
pub mod surface;

pub use adapter::{Backend, InkAdapter, RecognitionHit};
pub use color::{decode_hex, encode_hex, Color, ColorError};
pub use config::{ConfigError, InkConfig};
pub use engine::{InkEngine, ManipulationMode};
pub use fallback::FallbackInk;
pub use pipeline::{GestureSink, InkPipeline, PointerInput, PointerKind, PointerOutcome};
pub use stroke::{DrawingAttributes, RecognitionResult, RenderingSegment, Stroke};
pub use surface::{DrawCommand, RecordingSurface, Surface};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A sampled pointer position as handed to an ink engine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPoint {
    pub position: Point,
    pub pressure: f64,
}

impl PointerPoint {
    pub const fn new(position: Point, pressure: f64) -> Self {
        Self { position, pressure }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }

    pub fn from_points<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        if min_x == f64::MAX {
            None
        } else {
            Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(29.9, 14.9)));
        assert!(!rect.contains(Point::new(30.0, 12.0)));
        assert!(!rect.contains(Point::new(12.0, 15.0)));
        assert!(!rect.contains(Point::new(9.9, 12.0)));
    }

    #[test]
    fn test_rect_from_points() {
        let rect = Rect::from_points([
            Point::new(4.0, 8.0),
            Point::new(-2.0, 3.0),
            Point::new(6.0, 5.0),
        ]);
        assert_eq!(rect, Some(Rect::new(-2.0, 3.0, 8.0, 5.0)));
        assert_eq!(Rect::from_points(Vec::new()), None);
    }
}
