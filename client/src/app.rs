use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlInputElement, PointerEvent,
};

use inkboard_shared::{InkConfig, InkPipeline, PointerKind};

use crate::canvas::CanvasSurface;
use crate::dom::{debug_enabled, get_element};
use crate::host::{HostGesture, HostInk};
use crate::logging;
use crate::state::{PointerPhase, State};

const CANVAS_ID: &str = "inkCanvas";
const COLOR_INPUT_ID: &str = "inputColor";
const CONFIG_ATTRIBUTE: &str = "data-ink-config";

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    js_sys::Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if document_ready_state(&document).as_deref() != Some("loading") {
        return start_app();
    }

    let started = Rc::new(Cell::new(false));
    let onready = Closure::<dyn FnMut(Event)>::new(move |_| {
        if started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", onready.as_ref().unchecked_ref())?;
    onready.forget();

    Ok(())
}

fn load_config(canvas: &HtmlCanvasElement) -> (InkConfig, Option<String>) {
    let Some(text) = canvas.get_attribute(CONFIG_ATTRIBUTE) else {
        return (InkConfig::default(), None);
    };
    match InkConfig::from_json(&text) {
        Ok(config) => (config, None),
        Err(err) => (InkConfig::default(), Some(err.to_string())),
    }
}

fn add_pointer_listener(
    canvas: &HtmlCanvasElement,
    event_name: &str,
    state: &Rc<RefCell<State>>,
    phase: PointerPhase,
) -> Result<(), JsValue> {
    let state = state.clone();
    let handler = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        if matches!(phase, PointerPhase::Down)
            && PointerKind::from_dom(&event.pointer_type()) != PointerKind::Touch
        {
            event.prevent_default();
        }
        state.borrow_mut().handle_pointer(phase, &event);
    });
    canvas.add_event_listener_with_callback(event_name, handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, CANVAS_ID)?;
    let color_input: HtmlInputElement = get_element(&document, COLOR_INPUT_ID)?;

    let (mut config, config_error) = load_config(&canvas);
    config.debug |= debug_enabled(&window);
    logging::init(config.debug);
    if let Some(err) = config_error {
        warn!(%err, "ignoring canvas ink config");
    }

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let surface = CanvasSurface::new(canvas.clone(), ctx);
    surface.fit_to_element();

    let host = HostInk::detect(&window);
    let gestures = if host.is_some() {
        HostGesture::attach(&window, &canvas)
    } else {
        None
    };
    let mut pipeline = InkPipeline::new(surface, host, config)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    if let Some(gestures) = gestures {
        pipeline = pipeline.with_gestures(Box::new(gestures));
    }
    let initial = color_input.value();
    if !initial.is_empty() {
        let _ = pipeline.set_color_hex(&initial);
    }
    info!(
        backend = ?pipeline.adapter().backend(),
        width = canvas.width(),
        height = canvas.height(),
        "ink canvas ready"
    );

    let state = Rc::new(RefCell::new(State::new(pipeline)));

    add_pointer_listener(&canvas, "pointerdown", &state, PointerPhase::Down)?;
    add_pointer_listener(&canvas, "pointermove", &state, PointerPhase::Move)?;
    add_pointer_listener(&canvas, "pointerup", &state, PointerPhase::Up)?;
    add_pointer_listener(&canvas, "pointerout", &state, PointerPhase::Out)?;

    {
        let color_state = state.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = event
                .current_target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            // Malformed values are logged and leave the color unchanged.
            let _ = color_state.borrow_mut().pipeline.set_color_hex(&input.value());
        });
        color_input.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let resize_state = state.clone();
        let onresize = Closure::<dyn FnMut(Event)>::new(move |_| {
            resize_state.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    Ok(())
}
