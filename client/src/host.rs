//! Bridge to the host platform's native ink manager
//! (`Windows.UI.Input.Inking`), reached through `Reflect` since there are no
//! bindings for it. Only present when the page runs inside that host.

use std::collections::VecDeque;

use js_sys::{Array, Function, Object, Reflect};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use inkboard_shared::{
    Color, DrawingAttributes, GestureSink, InkEngine, ManipulationMode, Point, PointerPoint,
    RecognitionResult, Rect, RenderingSegment, Stroke,
};

pub fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function = get(target, method)?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("Missing method: {method}")))?;
    function.apply(target, &args.iter().collect::<Array>())
}

fn construct(constructor: &JsValue) -> Result<JsValue, JsValue> {
    let constructor = constructor
        .clone()
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str("Not a constructor"))?;
    Reflect::construct(&constructor, &Array::new()).map(JsValue::from)
}

/// Walks a dotted path of properties, `None` when any step is missing.
fn lookup(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = root.clone();
    for key in path {
        current = get(&current, key).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}

pub fn number(target: &JsValue, key: &str) -> Option<f64> {
    get(target, key).ok()?.as_f64()
}

pub fn point_from_js(value: &JsValue) -> Option<Point> {
    Some(Point::new(number(value, "x")?, number(value, "y")?))
}

fn point_to_js(point: Point) -> JsValue {
    let object = Object::new();
    let _ = set(&object, "x", &point.x.into());
    let _ = set(&object, "y", &point.y.into());
    object.into()
}

fn rect_from_js(value: &JsValue) -> Option<Rect> {
    Some(Rect::new(
        number(value, "x")?,
        number(value, "y")?,
        number(value, "width")?,
        number(value, "height")?,
    ))
}

fn color_from_js(value: &JsValue) -> Option<Color> {
    let channel = |key| number(value, key).map(|v| v.clamp(0.0, 255.0) as u8);
    Some(Color::rgba(
        channel("r")?,
        channel("g")?,
        channel("b")?,
        channel("a").unwrap_or(255),
    ))
}

fn color_to_js(color: Color) -> JsValue {
    let object = Object::new();
    let _ = set(&object, "a", &color.a.into());
    let _ = set(&object, "r", &color.r.into());
    let _ = set(&object, "g", &color.g.into());
    let _ = set(&object, "b", &color.b.into());
    object.into()
}

/// Items of a WinRT vector (`size`) or a JS array (`length`).
pub fn list(value: &JsValue) -> Vec<JsValue> {
    let len = number(value, "size")
        .or_else(|| number(value, "length"))
        .unwrap_or(0.0) as u32;
    (0..len)
        .filter_map(|index| Reflect::get_u32(value, index).ok())
        .collect()
}

fn log_failure(context: &str, err: &JsValue) {
    warn!(error = ?err, "host ink call failed: {context}");
}

fn stroke_from_js(value: &JsValue) -> Option<Stroke> {
    let segments = call(value, "getRenderingSegments", &[]).ok()?;
    let segments = list(&segments)
        .iter()
        .enumerate()
        .filter_map(|(index, segment)| {
            let position = point_from_js(&get(segment, "position").ok()?)?;
            if index == 0 {
                return Some(RenderingSegment::Start(position));
            }
            Some(RenderingSegment::Bezier {
                control_point1: point_from_js(&get(segment, "bezierControlPoint1").ok()?)?,
                control_point2: point_from_js(&get(segment, "bezierControlPoint2").ok()?)?,
                end: position,
            })
        })
        .collect();

    let attrs = get(value, "drawingAttributes").ok()?;
    let size = get(&attrs, "size").ok()?;
    let attributes = DrawingAttributes {
        color: get(&attrs, "color")
            .ok()
            .and_then(|color| color_from_js(&color))
            .unwrap_or(Color::BLACK),
        stroke_width: number(&size, "width").unwrap_or(1.0),
        fit_to_curve: get(&attrs, "fitToCurve")
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(true),
    };
    let mut stroke = Stroke::new(segments, attributes);
    stroke.selected = get(value, "selected")
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false);
    Some(stroke)
}

fn recognition_from_js(value: &JsValue) -> Option<RecognitionResult> {
    let bounding_rect = rect_from_js(&get(value, "boundingRect").ok()?)?;
    let candidates = call(value, "getTextCandidates", &[])
        .map(|candidates| {
            list(&candidates)
                .iter()
                .filter_map(JsValue::as_string)
                .collect()
        })
        .unwrap_or_default();
    Some(RecognitionResult {
        bounding_rect,
        candidates,
    })
}

/// Native ink manager. The host consumes its own pointer point objects, so
/// the raw points of each event are staged here before the pipeline runs
/// and taken in call order.
pub struct HostInk {
    manager: JsValue,
    attrs: JsValue,
    modes: JsValue,
    defaults: DrawingAttributes,
    staged: VecDeque<JsValue>,
}

impl HostInk {
    pub fn detect(window: &Window) -> Option<HostInk> {
        let inking = lookup(window.as_ref(), &["Windows", "UI", "Input", "Inking"])?;
        match HostInk::create(&inking) {
            Ok(host) => {
                info!("host ink manager available");
                Some(host)
            }
            Err(err) => {
                log_failure("create", &err);
                None
            }
        }
    }

    fn create(inking: &JsValue) -> Result<HostInk, JsValue> {
        let manager = construct(&get(inking, "InkManager")?)?;
        let attrs = construct(&get(inking, "InkDrawingAttributes")?)?;
        let modes = get(inking, "InkManipulationMode")?;
        set(&manager, "mode", &get(&modes, "inking")?)?;
        Ok(HostInk {
            manager,
            attrs,
            modes,
            defaults: DrawingAttributes::default(),
            staged: VecDeque::new(),
        })
    }

    /// Replaces the staged raw points with those of the current event.
    pub fn stage(&mut self, points: Vec<JsValue>) {
        self.staged = points.into();
    }

    fn process(&mut self, method: &str) -> Option<JsValue> {
        let Some(raw) = self.staged.pop_front() else {
            debug!(method, "no staged host point");
            return None;
        };
        match call(&self.manager, method, &[raw]) {
            Ok(value) => Some(value),
            Err(err) => {
                log_failure(method, &err);
                None
            }
        }
    }

    fn js_strokes(&self) -> Vec<JsValue> {
        match call(&self.manager, "getStrokes", &[]) {
            Ok(strokes) => list(&strokes),
            Err(err) => {
                log_failure("getStrokes", &err);
                Vec::new()
            }
        }
    }

    fn push_defaults(&self, attributes: &DrawingAttributes) -> Result<(), JsValue> {
        set(&self.attrs, "color", &color_to_js(attributes.color))?;
        // `size` is a value type on the host side; write it back whole.
        let size = get(&self.attrs, "size")?;
        set(&size, "width", &attributes.stroke_width.into())?;
        set(&size, "height", &attributes.stroke_width.into())?;
        set(&self.attrs, "size", &size)?;
        set(&self.attrs, "fitToCurve", &attributes.fit_to_curve.into())?;
        call(&self.manager, "setDefaultDrawingAttributes", &[self.attrs.clone()])?;
        Ok(())
    }

    fn recolor(stroke: &JsValue, color: Color) -> Result<bool, JsValue> {
        // Attributes come back as a copy and must be assigned back.
        let attrs = get(stroke, "drawingAttributes")?;
        if get(&attrs, "color").ok().and_then(|c| color_from_js(&c)) == Some(color) {
            return Ok(false);
        }
        set(&attrs, "color", &color_to_js(color))?;
        set(stroke, "drawingAttributes", &attrs)?;
        Ok(true)
    }
}

impl InkEngine for HostInk {
    fn begin_stroke(&mut self, _point: PointerPoint) {
        self.process("processPointerDown");
    }

    fn extend_stroke(&mut self, _point: PointerPoint) {
        self.process("processPointerUpdate");
    }

    fn end_stroke(&mut self, _point: PointerPoint) -> Option<Rect> {
        self.process("processPointerUp")
            .and_then(|rect| rect_from_js(&rect))
    }

    fn strokes(&self) -> Vec<Stroke> {
        self.js_strokes().iter().filter_map(stroke_from_js).collect()
    }

    fn recognition_results(&self) -> Vec<RecognitionResult> {
        match call(&self.manager, "getRecognitionResults", &[]) {
            Ok(results) => list(&results).iter().filter_map(recognition_from_js).collect(),
            Err(err) => {
                log_failure("getRecognitionResults", &err);
                Vec::new()
            }
        }
    }

    fn set_default_attributes(&mut self, attributes: &DrawingAttributes) {
        self.defaults = *attributes;
        if let Err(err) = self.push_defaults(attributes) {
            log_failure("setDefaultDrawingAttributes", &err);
        }
    }

    fn default_attributes(&self) -> DrawingAttributes {
        self.defaults
    }

    fn select_with_line(&mut self, from: Point, to: Point) -> Option<Rect> {
        match call(
            &self.manager,
            "selectWithLine",
            &[point_to_js(from), point_to_js(to)],
        ) {
            Ok(rect) => rect_from_js(&rect),
            Err(err) => {
                log_failure("selectWithLine", &err);
                None
            }
        }
    }

    fn mode(&self) -> ManipulationMode {
        let Some(mode) = number(&self.manager, "mode") else {
            return ManipulationMode::Inking;
        };
        if Some(mode) == number(&self.modes, "selecting") {
            ManipulationMode::Selecting
        } else if Some(mode) == number(&self.modes, "erasing") {
            ManipulationMode::Erasing
        } else {
            ManipulationMode::Inking
        }
    }

    fn recolor_last_stroke(&mut self, color: Color) -> bool {
        let Some(stroke) = self.js_strokes().pop() else {
            return false;
        };
        HostInk::recolor(&stroke, color).unwrap_or_else(|err| {
            log_failure("recolor", &err);
            false
        })
    }
}

/// Host gesture recognizer fed with touch pointers.
pub struct HostGesture {
    gesture: JsValue,
}

impl HostGesture {
    pub fn attach(window: &Window, canvas: &HtmlCanvasElement) -> Option<HostGesture> {
        let constructor = lookup(window.as_ref(), &["MSGesture"])?;
        let gesture = construct(&constructor)
            .and_then(|gesture| set(&gesture, "target", canvas.as_ref()).map(|_| gesture));
        match gesture {
            Ok(gesture) => Some(HostGesture { gesture }),
            Err(err) => {
                log_failure("MSGesture", &err);
                None
            }
        }
    }
}

impl GestureSink for HostGesture {
    fn add_pointer(&mut self, pointer_id: i32) {
        if let Err(err) = call(&self.gesture, "addPointer", &[pointer_id.into()]) {
            log_failure("addPointer", &err);
        }
    }
}
