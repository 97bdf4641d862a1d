use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, PointerEvent, Window};

use inkboard_shared::{Point, PointerInput, PointerKind, PointerPoint};

use crate::host::{get, list, number, point_from_js};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}

/// Host pointer point objects carried by an event, when the host supplies
/// them.
#[derive(Default)]
pub struct RawPoints {
    pub current: Option<JsValue>,
    /// Newest first, like the event delivers them.
    pub intermediate: Vec<JsValue>,
}

fn present(value: JsValue) -> Option<JsValue> {
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Canvas position and pressure of a host pointer point.
fn host_sample(raw: &JsValue) -> Option<PointerPoint> {
    let position = point_from_js(&get(raw, "rawPosition").ok()?)?;
    let pressure = get(raw, "properties")
        .ok()
        .and_then(|properties| number(&properties, "pressure"))
        .unwrap_or(0.5);
    Some(PointerPoint::new(position, pressure))
}

/// Canvas-relative position of a DOM event. `clientX`/`clientY` are read
/// as numbers so sub-pixel pen positions survive.
fn event_sample(canvas: &HtmlCanvasElement, event: &PointerEvent) -> PointerPoint {
    let rect = canvas.get_bounding_client_rect();
    let client_x = number(event.as_ref(), "clientX").unwrap_or(event.client_x() as f64);
    let client_y = number(event.as_ref(), "clientY").unwrap_or(event.client_y() as f64);
    PointerPoint::new(
        Point::new(client_x - rect.left(), client_y - rect.top()),
        event.pressure() as f64,
    )
}

/// Browser coalesced events, oldest first.
fn coalesced_pointer_events(event: &PointerEvent) -> Vec<PointerEvent> {
    let Some(get_coalesced_events) =
        Reflect::get(event.as_ref(), &JsValue::from_str("getCoalescedEvents"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    else {
        return Vec::new();
    };
    let Ok(events) = get_coalesced_events
        .call0(event.as_ref())
        .and_then(|value| value.dyn_into::<js_sys::Array>())
    else {
        return Vec::new();
    };
    events
        .iter()
        .filter_map(|event| event.dyn_into::<PointerEvent>().ok())
        .collect()
}

/// Converts a DOM pointer event. Host point objects (`currentPoint`,
/// `intermediatePoints`) win over the plain event fields when present.
pub fn pointer_input(canvas: &HtmlCanvasElement, event: &PointerEvent) -> (PointerInput, RawPoints) {
    let mut raw = RawPoints::default();
    let mut current = event_sample(canvas, event);
    let mut intermediate = Vec::new();

    if let Some(point) = get(event.as_ref(), "currentPoint").ok().and_then(present) {
        if let Some(sample) = host_sample(&point) {
            current = sample;
        }
        raw.current = Some(point);
    }

    if let Some(points) = get(event.as_ref(), "intermediatePoints")
        .ok()
        .and_then(present)
    {
        for point in list(&points) {
            if let Some(sample) = host_sample(&point) {
                intermediate.push(sample);
                raw.intermediate.push(point);
            }
        }
    } else {
        intermediate = coalesced_pointer_events(event)
            .iter()
            .rev()
            .map(|coalesced| event_sample(canvas, coalesced))
            .collect();
        if intermediate.is_empty() {
            intermediate.push(current);
        }
    }

    let input = PointerInput {
        pointer_id: event.pointer_id(),
        kind: PointerKind::from_dom(&event.pointer_type()),
        button: event.button(),
        pressure: current.pressure,
        position: current.position,
        intermediate_points: intermediate,
    };
    (input, raw)
}
