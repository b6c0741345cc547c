// Host-side tests for pure keyboard functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod dom {
    include!("../src/dom.rs");
}
mod overlay {
    include!("../src/overlay.rs");
}
mod emulator {
    include!("../src/emulator.rs");
}
mod keyboard {
    include!("../src/events/keyboard.rs");
}

use ar_core::{EMU_HEADSET_PITCH_DEG, EMU_NUDGE_STEP_DEG, EMU_PITCH_LIMIT_DEG};
use emulator::EmulatedRig;
use keyboard::{action_for_key, KeyAction};

#[test]
fn arrows_nudge_by_one_step() {
    let s = EMU_NUDGE_STEP_DEG;
    assert_eq!(action_for_key("ArrowLeft"), Some(KeyAction::Nudge(s, 0.0)));
    assert_eq!(action_for_key("ArrowRight"), Some(KeyAction::Nudge(-s, 0.0)));
    assert_eq!(action_for_key("ArrowUp"), Some(KeyAction::Nudge(0.0, s)));
    assert_eq!(action_for_key("ArrowDown"), Some(KeyAction::Nudge(0.0, -s)));
}

#[test]
fn letter_keys_are_case_insensitive() {
    for k in ["r", "R"] {
        assert_eq!(action_for_key(k), Some(KeyAction::ResetView));
    }
    for k in ["d", "D"] {
        assert_eq!(action_for_key(k), Some(KeyAction::ToggleDebug));
    }
}

#[test]
fn unmapped_keys_do_nothing() {
    for k in ["", " ", "Enter", "x", "1", "Shift"] {
        assert_eq!(action_for_key(k), None, "key {k:?}");
    }
}

#[test]
fn held_arrow_stops_at_pitch_limit() {
    let mut rig = EmulatedRig::default();
    let Some(KeyAction::Nudge(yaw, pitch)) = action_for_key("ArrowDown") else {
        panic!("ArrowDown must nudge");
    };
    for _ in 0..200 {
        rig.nudge(yaw, pitch);
    }
    assert_eq!(rig.pitch_deg(), -EMU_PITCH_LIMIT_DEG);

    rig.reset();
    assert_eq!(rig.pitch_deg(), EMU_HEADSET_PITCH_DEG);
    assert_eq!(rig.yaw_deg(), 0.0);
}
