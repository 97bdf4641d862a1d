//! One ink capability set over either the host engine or the fallback.

use tracing::info;

use crate::color::Color;
use crate::config::{ConfigError, InkConfig};
use crate::engine::{InkEngine, ManipulationMode};
use crate::fallback::FallbackInk;
use crate::stroke::{DrawingAttributes, RecognitionResult, Stroke};
use crate::{Point, PointerPoint, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Native,
    Fallback,
}

/// Recognition result found under a point.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionHit {
    pub index: usize,
    pub point: Point,
    pub result: RecognitionResult,
}

pub enum InkAdapter<H> {
    Native(H),
    Fallback(FallbackInk),
}

impl<H: InkEngine> InkAdapter<H> {
    /// Picks the backend once: the host engine when one was found,
    /// otherwise the fallback. An invalid initial color is rejected.
    pub fn new(host: Option<H>, config: &InkConfig) -> Result<Self, ConfigError> {
        let attributes = config.drawing_attributes()?;
        let mut adapter = match host {
            Some(host) => InkAdapter::Native(host),
            None => InkAdapter::Fallback(FallbackInk::new(config)),
        };
        adapter.set_default_attributes(&attributes);
        info!(backend = ?adapter.backend(), "ink backend selected");
        Ok(adapter)
    }

    pub fn backend(&self) -> Backend {
        match self {
            InkAdapter::Native(_) => Backend::Native,
            InkAdapter::Fallback(_) => Backend::Fallback,
        }
    }

    pub fn engine(&self) -> &dyn InkEngine {
        match self {
            InkAdapter::Native(host) => host,
            InkAdapter::Fallback(fallback) => fallback,
        }
    }

    pub fn engine_mut(&mut self) -> &mut dyn InkEngine {
        match self {
            InkAdapter::Native(host) => host,
            InkAdapter::Fallback(fallback) => fallback,
        }
    }

    pub fn native_mut(&mut self) -> Option<&mut H> {
        match self {
            InkAdapter::Native(host) => Some(host),
            InkAdapter::Fallback(_) => None,
        }
    }

    pub fn begin_stroke(&mut self, point: PointerPoint) {
        self.engine_mut().begin_stroke(point);
    }

    pub fn extend_stroke(&mut self, point: PointerPoint) {
        self.engine_mut().extend_stroke(point);
    }

    pub fn end_stroke(&mut self, point: PointerPoint) -> Option<Rect> {
        self.engine_mut().end_stroke(point)
    }

    pub fn strokes(&self) -> Vec<Stroke> {
        self.engine().strokes()
    }

    pub fn recognition_results(&self) -> Vec<RecognitionResult> {
        self.engine().recognition_results()
    }

    pub fn set_default_attributes(&mut self, attributes: &DrawingAttributes) {
        self.engine_mut().set_default_attributes(attributes);
    }

    pub fn default_attributes(&self) -> DrawingAttributes {
        self.engine().default_attributes()
    }

    pub fn select_with_line(&mut self, from: Point, to: Point) -> Option<Rect> {
        self.engine_mut().select_with_line(from, to)
    }

    pub fn mode(&self) -> ManipulationMode {
        self.engine().mode()
    }

    pub fn recolor_last_stroke(&mut self, color: Color) -> bool {
        self.engine_mut().recolor_last_stroke(color)
    }

    /// Color for the next stroke. Committed strokes keep theirs.
    pub fn set_color(&mut self, color: Color) {
        let mut attributes = self.default_attributes();
        attributes.color = color;
        self.set_default_attributes(&attributes);
    }

    /// Sets the next stroke's width from pointer pressure.
    pub fn apply_pressure(&mut self, pressure: f64, multiplier: f64) -> f64 {
        let mut attributes = self.default_attributes();
        attributes.stroke_width = pressure * multiplier;
        self.set_default_attributes(&attributes);
        attributes.stroke_width
    }

    pub fn hit_test(&self, point: Point) -> Option<RecognitionHit> {
        self.recognition_results()
            .into_iter()
            .enumerate()
            .find(|(_, result)| result.bounding_rect.contains(point))
            .map(|(index, result)| RecognitionHit {
                index,
                point,
                result,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedHost {
        calls: Vec<String>,
        defaults: DrawingAttributes,
        results: Vec<RecognitionResult>,
    }

    impl InkEngine for ScriptedHost {
        fn begin_stroke(&mut self, point: PointerPoint) {
            self.calls.push(format!("begin {:?}", point.position));
        }

        fn extend_stroke(&mut self, point: PointerPoint) {
            self.calls.push(format!("extend {:?}", point.position));
        }

        fn end_stroke(&mut self, point: PointerPoint) -> Option<Rect> {
            self.calls.push(format!("end {:?}", point.position));
            None
        }

        fn strokes(&self) -> Vec<Stroke> {
            Vec::new()
        }

        fn recognition_results(&self) -> Vec<RecognitionResult> {
            self.results.clone()
        }

        fn set_default_attributes(&mut self, attributes: &DrawingAttributes) {
            self.defaults = *attributes;
        }

        fn default_attributes(&self) -> DrawingAttributes {
            self.defaults
        }

        fn select_with_line(&mut self, _from: Point, _to: Point) -> Option<Rect> {
            self.calls.push("select".to_string());
            None
        }

        fn mode(&self) -> ManipulationMode {
            ManipulationMode::Inking
        }

        fn recolor_last_stroke(&mut self, _color: Color) -> bool {
            false
        }
    }

    fn word(x: f64, text: &str) -> RecognitionResult {
        RecognitionResult {
            bounding_rect: Rect::new(x, 0.0, 10.0, 10.0),
            candidates: vec![text.to_string()],
        }
    }

    #[test]
    fn test_backend_chosen_from_host_presence() {
        let config = InkConfig::default();
        let native = InkAdapter::new(Some(ScriptedHost::default()), &config).unwrap();
        assert_eq!(native.backend(), Backend::Native);
        let fallback = InkAdapter::<ScriptedHost>::new(None, &config).unwrap();
        assert_eq!(fallback.backend(), Backend::Fallback);
    }

    #[test]
    fn test_native_calls_are_forwarded() {
        let mut adapter = InkAdapter::new(Some(ScriptedHost::default()), &InkConfig::default()).unwrap();
        adapter.begin_stroke(PointerPoint::new(Point::new(1.0, 2.0), 0.5));
        adapter.end_stroke(PointerPoint::new(Point::new(3.0, 4.0), 0.5));
        let host = adapter.native_mut().unwrap();
        assert_eq!(host.calls.len(), 2);
        assert!(host.calls[0].starts_with("begin"));
        assert!(host.calls[1].starts_with("end"));
    }

    #[test]
    fn test_construction_pushes_config_defaults() {
        let config = InkConfig {
            initial_color: "#336699".to_string(),
            line_width: 3.0,
            ..InkConfig::default()
        };
        let adapter = InkAdapter::new(Some(ScriptedHost::default()), &config).unwrap();
        let attributes = adapter.default_attributes();
        assert_eq!(attributes.color, Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(attributes.stroke_width, 3.0);
    }

    #[test]
    fn test_invalid_initial_color_rejected() {
        let config = InkConfig {
            initial_color: "#abcd".to_string(),
            ..InkConfig::default()
        };
        assert!(InkAdapter::<ScriptedHost>::new(None, &config).is_err());
    }

    #[test]
    fn test_pressure_sets_width() {
        let mut adapter = InkAdapter::<ScriptedHost>::new(None, &InkConfig::default()).unwrap();
        for pressure in [0.1, 0.5, 1.0] {
            let width = adapter.apply_pressure(pressure, 15.0);
            assert_eq!(width, pressure * 15.0);
            assert_eq!(adapter.default_attributes().stroke_width, pressure * 15.0);
        }
    }

    #[test]
    fn test_set_color_keeps_width() {
        let mut adapter = InkAdapter::<ScriptedHost>::new(None, &InkConfig::default()).unwrap();
        adapter.apply_pressure(0.4, 15.0);
        adapter.set_color(Color::rgb(9, 9, 9));
        let attributes = adapter.default_attributes();
        assert_eq!(attributes.color, Color::rgb(9, 9, 9));
        assert_eq!(attributes.stroke_width, 0.4 * 15.0);
    }

    #[test]
    fn test_hit_test_finds_first_containing_result() {
        let host = ScriptedHost {
            results: vec![word(0.0, "hello"), word(20.0, "world")],
            ..ScriptedHost::default()
        };
        let adapter = InkAdapter::new(Some(host), &InkConfig::default()).unwrap();
        let hit = adapter.hit_test(Point::new(25.0, 5.0)).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.result.candidates, vec!["world".to_string()]);
        assert_eq!(adapter.hit_test(Point::new(15.0, 5.0)), None);
    }

    #[test]
    fn test_fallback_has_no_recognition() {
        let adapter = InkAdapter::<ScriptedHost>::new(None, &InkConfig::default()).unwrap();
        assert!(adapter.recognition_results().is_empty());
        assert_eq!(adapter.hit_test(Point::new(1.0, 1.0)), None);
    }
}
