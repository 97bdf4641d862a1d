//! Pointer events to ink strokes and canvas feedback.
//!
//! One `InkPipeline` per canvas. It owns the pointer session, so at most one
//! pointer inks at a time; events from any other pointer id are dropped.

use tracing::{debug, warn};

use crate::adapter::InkAdapter;
use crate::color::{decode_hex, encode_hex, Color, ColorError};
use crate::config::{ConfigError, InkConfig};
use crate::engine::{InkEngine, ManipulationMode};
use crate::render::render_all;
use crate::surface::Surface;
use crate::{Point, PointerPoint, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Pen,
    Mouse,
    Touch,
    Other,
}

impl PointerKind {
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "pen" => PointerKind::Pen,
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            _ => PointerKind::Other,
        }
    }
}

/// One pointer event as seen by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput {
    pub pointer_id: i32,
    pub kind: PointerKind,
    pub button: i16,
    pub pressure: f64,
    pub position: Point,
    /// Points sampled since the previous event, newest first.
    pub intermediate_points: Vec<PointerPoint>,
}

impl PointerInput {
    pub fn new(pointer_id: i32, kind: PointerKind, position: Point) -> Self {
        Self {
            pointer_id,
            kind,
            button: 0,
            pressure: 0.5,
            position,
            intermediate_points: Vec::new(),
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn with_intermediate_points(mut self, points: Vec<PointerPoint>) -> Self {
        self.intermediate_points = points;
        self
    }

    pub fn current_point(&self) -> PointerPoint {
        PointerPoint::new(self.position, self.pressure)
    }

    fn starts_ink(&self) -> bool {
        match self.kind {
            PointerKind::Pen => true,
            PointerKind::Mouse => self.button == 0,
            _ => false,
        }
    }
}

/// Receives touch pointers, which never ink.
pub trait GestureSink {
    fn add_pointer(&mut self, pointer_id: i32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Session {
    Idle,
    Inking { pointer_id: i32 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    Started,
    Extended { points: usize },
    Gesture,
    /// Stroke ended. When `selecting` is set, `bounds` is the selection
    /// rect for the caller to act on.
    Finished { bounds: Option<Rect>, selecting: bool },
}

pub struct InkPipeline<S, H> {
    surface: S,
    adapter: InkAdapter<H>,
    config: InkConfig,
    color: Color,
    session: Session,
    gestures: Option<Box<dyn GestureSink>>,
}

impl<S: Surface, H: InkEngine> InkPipeline<S, H> {
    pub fn new(mut surface: S, host: Option<H>, config: InkConfig) -> Result<Self, ConfigError> {
        let adapter = InkAdapter::new(host, &config)?;
        let color = adapter.default_attributes().color;
        surface.set_line_width(config.line_width);
        surface.set_line_cap(&config.line_cap);
        surface.set_line_join(&config.line_join);
        surface.set_stroke_style(&encode_hex(color));
        Ok(Self {
            surface,
            adapter,
            config,
            color,
            session: Session::Idle,
            gestures: None,
        })
    }

    pub fn with_gestures(mut self, gestures: Box<dyn GestureSink>) -> Self {
        self.gestures = Some(gestures);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn adapter(&self) -> &InkAdapter<H> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut InkAdapter<H> {
        &mut self.adapter
    }

    pub fn config(&self) -> &InkConfig {
        &self.config
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn active_pointer(&self) -> Option<i32> {
        match self.session {
            Session::Idle => None,
            Session::Inking { pointer_id } => Some(pointer_id),
        }
    }

    /// Applies a color-input value. A malformed value is rejected and the
    /// current color is kept.
    pub fn set_color_hex(&mut self, value: &str) -> Result<Color, ColorError> {
        let color = decode_hex(value).inspect_err(|err| {
            warn!(value, %err, "rejected color change");
        })?;
        self.set_color(color);
        Ok(color)
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.surface.set_stroke_style(&encode_hex(color));
        self.adapter.set_color(color);
    }

    pub fn pointer_down(&mut self, input: &PointerInput) -> PointerOutcome {
        if let Session::Inking { pointer_id } = self.session {
            debug!(
                active = pointer_id,
                pointer_id = input.pointer_id,
                "pointer down while inking, ignored"
            );
            return PointerOutcome::Ignored;
        }
        if input.starts_ink() {
            self.session = Session::Inking {
                pointer_id: input.pointer_id,
            };
            let origin = Point::default();
            self.adapter.select_with_line(origin, origin);

            let width = self
                .adapter
                .apply_pressure(input.pressure, self.config.pressure_multiplier);
            self.adapter.set_color(self.color);

            self.surface.set_stroke_style(&encode_hex(self.color));
            self.surface.set_line_width(width);
            self.surface.begin_path();
            self.surface.move_to(input.position);

            self.adapter.begin_stroke(input.current_point());
            debug!(pointer_id = input.pointer_id, width, "stroke started");
            return PointerOutcome::Started;
        }
        if input.kind == PointerKind::Touch {
            if let Some(gestures) = self.gestures.as_mut() {
                gestures.add_pointer(input.pointer_id);
                return PointerOutcome::Gesture;
            }
        }
        debug!(pointer_id = input.pointer_id, kind = ?input.kind, "pointer down ignored");
        PointerOutcome::Ignored
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> PointerOutcome {
        if !self.is_active(input.pointer_id) {
            return PointerOutcome::Ignored;
        }
        self.surface.line_to(input.position);
        self.surface.stroke();
        // A move with no coalesced samples still carries its own point.
        let points = if input.intermediate_points.is_empty() {
            vec![input.current_point()]
        } else {
            input.intermediate_points.iter().rev().copied().collect()
        };
        for point in &points {
            self.adapter.extend_stroke(*point);
        }
        PointerOutcome::Extended {
            points: points.len(),
        }
    }

    pub fn pointer_up(&mut self, input: &PointerInput) -> PointerOutcome {
        self.finish(input)
    }

    /// Leaving the canvas ends the stroke exactly like lifting the pen.
    pub fn pointer_out(&mut self, input: &PointerInput) -> PointerOutcome {
        self.finish(input)
    }

    fn finish(&mut self, input: &PointerInput) -> PointerOutcome {
        if !self.is_active(input.pointer_id) {
            return PointerOutcome::Ignored;
        }
        self.surface.line_to(input.position);
        self.surface.stroke();
        self.surface.close_path();

        let bounds = self.adapter.end_stroke(input.current_point());
        self.session = Session::Idle;
        let selecting = self.adapter.mode() == ManipulationMode::Selecting;
        self.redraw();
        debug!(pointer_id = input.pointer_id, ?bounds, selecting, "stroke finished");
        PointerOutcome::Finished { bounds, selecting }
    }

    /// Clears the surface and re-renders every committed stroke.
    pub fn redraw(&mut self) {
        if self.config.recolor_last_stroke {
            self.adapter.recolor_last_stroke(self.color);
        }
        let strokes = self.adapter.strokes();
        render_all(&mut self.surface, &strokes);
    }

    /// Re-applies the pen setup after the surface was resized, which resets
    /// canvas state, then redraws.
    pub fn resize(&mut self) {
        self.surface.set_line_width(self.config.line_width);
        self.surface.set_line_cap(&self.config.line_cap);
        self.surface.set_line_join(&self.config.line_join);
        self.surface.set_stroke_style(&encode_hex(self.color));
        self.redraw();
    }

    fn is_active(&self, pointer_id: i32) -> bool {
        self.session == Session::Inking { pointer_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Backend;
    use crate::fallback::FallbackInk;
    use crate::surface::{DrawCommand, RecordingSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    type FallbackPipeline = InkPipeline<RecordingSurface, FallbackInk>;

    fn pipeline() -> FallbackPipeline {
        InkPipeline::new(RecordingSurface::new(200.0, 100.0), None, InkConfig::default()).unwrap()
    }

    fn pen(id: i32, x: f64, y: f64) -> PointerInput {
        PointerInput::new(id, PointerKind::Pen, Point::new(x, y))
    }

    struct Gestures(Rc<RefCell<Vec<i32>>>);

    impl GestureSink for Gestures {
        fn add_pointer(&mut self, pointer_id: i32) {
            self.0.borrow_mut().push(pointer_id);
        }
    }

    #[test]
    fn test_pen_and_left_mouse_start_strokes() {
        let mut ink = pipeline();
        assert_eq!(ink.adapter().backend(), Backend::Fallback);
        assert_eq!(ink.pointer_down(&pen(1, 0.0, 0.0)), PointerOutcome::Started);
        assert_eq!(ink.active_pointer(), Some(1));
        ink.pointer_up(&pen(1, 1.0, 1.0));

        let mouse = PointerInput::new(2, PointerKind::Mouse, Point::new(0.0, 0.0));
        assert_eq!(ink.pointer_down(&mouse), PointerOutcome::Started);
        ink.pointer_up(&mouse);

        let right = mouse.clone().with_button(2);
        assert_eq!(ink.pointer_down(&right), PointerOutcome::Ignored);
        assert_eq!(ink.active_pointer(), None);
    }

    #[test]
    fn test_touch_goes_to_gestures() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ink = pipeline().with_gestures(Box::new(Gestures(seen.clone())));
        let touch = PointerInput::new(4, PointerKind::Touch, Point::new(5.0, 5.0));
        assert_eq!(ink.pointer_down(&touch), PointerOutcome::Gesture);
        assert_eq!(*seen.borrow(), vec![4]);
        assert_eq!(ink.active_pointer(), None);
        assert_eq!(ink.pointer_up(&touch), PointerOutcome::Ignored);
        assert!(ink.adapter().strokes().is_empty());
    }

    #[test]
    fn test_touch_without_gestures_is_ignored() {
        let mut ink = pipeline();
        let touch = PointerInput::new(4, PointerKind::Touch, Point::new(5.0, 5.0));
        assert_eq!(ink.pointer_down(&touch), PointerOutcome::Ignored);
    }

    #[test]
    fn test_second_pointer_is_isolated() {
        let mut ink = pipeline();
        ink.pointer_down(&pen(1, 0.0, 0.0));
        ink.surface_mut().take_commands();

        assert_eq!(ink.pointer_down(&pen(2, 50.0, 50.0)), PointerOutcome::Ignored);
        assert_eq!(ink.pointer_move(&pen(2, 60.0, 60.0)), PointerOutcome::Ignored);
        assert_eq!(ink.pointer_up(&pen(2, 70.0, 70.0)), PointerOutcome::Ignored);
        assert_eq!(ink.active_pointer(), Some(1));
        assert!(ink.surface().commands().is_empty());
        assert!(ink.adapter().strokes().is_empty());
    }

    #[test]
    fn test_down_draws_live_path_with_pressure_width() {
        let mut ink = pipeline();
        ink.surface_mut().take_commands();
        ink.pointer_down(&pen(3, 10.0, 20.0).with_pressure(0.4));
        let width = 0.4 * 15.0;
        assert_eq!(
            ink.surface().commands(),
            &[
                DrawCommand::SetStrokeStyle("#000000".to_string()),
                DrawCommand::SetLineWidth(width),
                DrawCommand::BeginPath,
                DrawCommand::MoveTo(Point::new(10.0, 20.0)),
            ]
        );
        assert_eq!(ink.adapter().default_attributes().stroke_width, width);
    }

    #[test]
    fn test_pointer_out_finishes_stroke() {
        let mut ink = pipeline();
        ink.pointer_down(&pen(1, 0.0, 0.0));
        let outcome = ink.pointer_out(&pen(1, 40.0, 0.0));
        assert!(matches!(
            outcome,
            PointerOutcome::Finished {
                bounds: Some(_),
                selecting: false
            }
        ));
        assert_eq!(ink.active_pointer(), None);
        assert_eq!(ink.adapter().strokes().len(), 1);
        assert_eq!(ink.pointer_move(&pen(1, 50.0, 0.0)), PointerOutcome::Ignored);
    }

    #[test]
    fn test_rejected_color_keeps_current() {
        let mut ink = pipeline();
        ink.set_color_hex("#00ff00").unwrap();
        assert_eq!(
            ink.set_color_hex("#00ff0"),
            Err(ColorError::InvalidFormat { len: 5 })
        );
        assert_eq!(ink.color(), Color::rgb(0, 255, 0));
        assert_eq!(
            ink.adapter().default_attributes().color,
            Color::rgb(0, 255, 0)
        );
    }

    #[test]
    fn test_committed_strokes_keep_their_color() {
        let mut ink = pipeline();
        ink.pointer_down(&pen(1, 0.0, 0.0));
        ink.pointer_up(&pen(1, 10.0, 0.0));
        ink.set_color_hex("#ff0000").unwrap();
        ink.redraw();
        let strokes = ink.adapter().strokes();
        assert_eq!(strokes[0].attributes.color, Color::BLACK);
    }

    #[test]
    fn test_recolor_last_stroke_policy() {
        let config = InkConfig {
            recolor_last_stroke: true,
            ..InkConfig::default()
        };
        let mut ink: FallbackPipeline =
            InkPipeline::new(RecordingSurface::new(200.0, 100.0), None, config).unwrap();
        ink.pointer_down(&pen(1, 0.0, 0.0));
        ink.pointer_up(&pen(1, 10.0, 0.0));
        ink.pointer_down(&pen(1, 0.0, 10.0));
        ink.pointer_up(&pen(1, 10.0, 10.0));

        ink.set_color_hex("#0000ff").unwrap();
        ink.redraw();
        let strokes = ink.adapter().strokes();
        assert_eq!(strokes[0].attributes.color, Color::BLACK);
        assert_eq!(strokes[1].attributes.color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_move_without_intermediates_extends_stroke() {
        let mut ink = pipeline();
        ink.pointer_down(&pen(1, 0.0, 0.0));
        assert_eq!(
            ink.pointer_move(&pen(1, 50.0, 80.0)),
            PointerOutcome::Extended { points: 1 }
        );
        ink.pointer_move(&pen(1, 90.0, 0.0));
        ink.pointer_up(&pen(1, 100.0, 0.0));

        let strokes = ink.adapter().strokes();
        let ends: Vec<Point> = strokes[0]
            .segments
            .iter()
            .map(|segment| segment.position())
            .collect();
        assert_eq!(
            ends,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 80.0),
                Point::new(90.0, 0.0),
                Point::new(100.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_resize_reapplies_pen_and_redraws() {
        let mut ink = pipeline();
        ink.set_color_hex("#ff0000").unwrap();
        ink.pointer_down(&pen(1, 0.0, 0.0));
        ink.pointer_up(&pen(1, 10.0, 10.0));
        ink.surface_mut().take_commands();

        ink.resize();
        let commands = ink.surface().commands();
        assert_eq!(
            &commands[..4],
            &[
                DrawCommand::SetLineWidth(5.0),
                DrawCommand::SetLineCap("round".to_string()),
                DrawCommand::SetLineJoin("round".to_string()),
                DrawCommand::SetStrokeStyle("#ff0000".to_string()),
            ]
        );
        assert!(commands[4..]
            .iter()
            .any(|command| matches!(command, DrawCommand::Stroke { .. })));
    }
}
