use tracing::info;
use web_sys::PointerEvent;

use inkboard_shared::{InkPipeline, PointerOutcome};

use crate::canvas::CanvasSurface;
use crate::dom::pointer_input;
use crate::host::HostInk;

pub type Pipeline = InkPipeline<CanvasSurface, HostInk>;

#[derive(Clone, Copy, Debug)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Out,
}

/// Everything one canvas needs, owned by that canvas's event closures.
pub struct State {
    pub pipeline: Pipeline,
}

impl State {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub fn handle_pointer(&mut self, phase: PointerPhase, event: &PointerEvent) -> PointerOutcome {
        let (input, raw) = pointer_input(self.pipeline.surface().canvas(), event);
        if let Some(host) = self.pipeline.adapter_mut().native_mut() {
            let staged = match phase {
                PointerPhase::Move if !raw.intermediate.is_empty() => {
                    raw.intermediate.into_iter().rev().collect()
                }
                _ => raw.current.into_iter().collect(),
            };
            host.stage(staged);
        }
        let outcome = match phase {
            PointerPhase::Down => self.pipeline.pointer_down(&input),
            PointerPhase::Move => self.pipeline.pointer_move(&input),
            PointerPhase::Up => self.pipeline.pointer_up(&input),
            PointerPhase::Out => self.pipeline.pointer_out(&input),
        };
        if let PointerOutcome::Finished {
            bounds: Some(bounds),
            selecting: true,
        } = &outcome
        {
            info!(?bounds, "selection ready");
        }
        outcome
    }

    pub fn resize(&mut self) {
        self.pipeline.surface().fit_to_element();
        self.pipeline.resize();
    }
}
