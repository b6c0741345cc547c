use std::cell::RefCell;
use std::rc::Rc;

use ar_core::EMU_NUDGE_STEP_DEG;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::emulator::EmulatedRig;
use crate::overlay;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    /// Turn the emulated headset by (yaw, pitch) degrees.
    Nudge(f32, f32),
    ResetView,
    ToggleDebug,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    let step = EMU_NUDGE_STEP_DEG;
    match key {
        "ArrowLeft" => Some(KeyAction::Nudge(step, 0.0)),
        "ArrowRight" => Some(KeyAction::Nudge(-step, 0.0)),
        "ArrowUp" => Some(KeyAction::Nudge(0.0, step)),
        "ArrowDown" => Some(KeyAction::Nudge(0.0, -step)),
        "r" | "R" => Some(KeyAction::ResetView),
        "d" | "D" => Some(KeyAction::ToggleDebug),
        _ => None,
    }
}

pub fn handle_emulator_keydown(ev: &web::KeyboardEvent, rig: &Rc<RefCell<EmulatedRig>>) {
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::Nudge(yaw, pitch) => {
            rig.borrow_mut().nudge(yaw, pitch);
            ev.prevent_default();
        }
        KeyAction::ResetView => {
            rig.borrow_mut().reset();
            log::info!("[emu] view reset");
        }
        KeyAction::ToggleDebug => {
            if let Some(document) = crate::dom::window_document() {
                overlay::toggle_debug(&document);
            }
        }
    }
}

pub fn wire_emulator_keys(rig: Rc<RefCell<EmulatedRig>>) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_emulator_keydown(&ev, &rig);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
