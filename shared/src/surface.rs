//! The 2D drawing surface strokes are rendered onto.

use crate::{Point, Rect};

/// Path and state primitives of a canvas-like 2D context.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);

    fn set_stroke_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: &str);
    fn set_line_join(&mut self, join: &str);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn bezier_curve_to(&mut self, control_point1: Point, control_point2: Point, end: Point);
    fn stroke(&mut self);

    fn clear_rect(&mut self, rect: Rect);

    fn clear(&mut self) {
        let rect = Rect::new(0.0, 0.0, self.width(), self.height());
        self.clear_rect(rect);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    SetStrokeStyle(String),
    SetLineWidth(f64),
    SetLineCap(String),
    SetLineJoin(String),
    BeginPath,
    ClosePath,
    MoveTo(Point),
    LineTo(Point),
    BezierCurveTo(Point, Point, Point),
    /// Stroke with the style and width in effect at the time.
    Stroke { style: String, width: f64 },
    ClearRect(Rect),
}

#[derive(Clone, Debug, PartialEq)]
struct PenState {
    stroke_style: String,
    line_width: f64,
    line_cap: String,
    line_join: String,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            stroke_style: "#000000".to_string(),
            line_width: 1.0,
            line_cap: "butt".to_string(),
            line_join: "miter".to_string(),
        }
    }
}

/// Headless surface that records every call and mirrors the canvas
/// save/restore stack.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    state: PenState,
    saved: Vec<PenState>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn stroke_style(&self) -> &str {
        &self.state.stroke_style
    }

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Commands issued since the most recent full clear.
    pub fn since_last_clear(&self) -> &[DrawCommand] {
        let full = Rect::new(0.0, 0.0, self.width, self.height);
        let start = self
            .commands
            .iter()
            .rposition(|command| *command == DrawCommand::ClearRect(full))
            .map(|index| index + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.state.stroke_style = style.to_string();
        self.commands
            .push(DrawCommand::SetStrokeStyle(style.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: &str) {
        self.state.line_cap = cap.to_string();
        self.commands.push(DrawCommand::SetLineCap(cap.to_string()));
    }

    fn set_line_join(&mut self, join: &str) {
        self.state.line_join = join.to_string();
        self.commands.push(DrawCommand::SetLineJoin(join.to_string()));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn move_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn bezier_curve_to(&mut self, control_point1: Point, control_point2: Point, end: Point) {
        self.commands
            .push(DrawCommand::BezierCurveTo(control_point1, control_point2, end));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke {
            style: self.state.stroke_style.clone(),
            width: self.state.line_width,
        });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRect(rect));
    }
}
