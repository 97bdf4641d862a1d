use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::stroke::{DrawingAttributes, RecognitionResult, Stroke};
use crate::{Point, PointerPoint, Rect};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ManipulationMode {
    #[default]
    Inking,
    Erasing,
    Selecting,
}

/// Capability set of a backing ink engine.
///
/// The engine owns the strokes; callers only read them back for rendering.
pub trait InkEngine {
    fn begin_stroke(&mut self, point: PointerPoint);
    fn extend_stroke(&mut self, point: PointerPoint);
    /// Finishes the stroke in progress. In selecting mode the returned rect
    /// bounds the selection.
    fn end_stroke(&mut self, point: PointerPoint) -> Option<Rect>;

    fn strokes(&self) -> Vec<Stroke>;
    fn recognition_results(&self) -> Vec<RecognitionResult>;

    fn set_default_attributes(&mut self, attributes: &DrawingAttributes);
    fn default_attributes(&self) -> DrawingAttributes;

    fn select_with_line(&mut self, from: Point, to: Point) -> Option<Rect>;
    fn mode(&self) -> ManipulationMode;

    /// Recolors the most recently committed stroke. Returns whether its
    /// color actually changed.
    fn recolor_last_stroke(&mut self, color: Color) -> bool;
}
