use std::cell::RefCell;
use std::rc::Rc;

use ar_core::{ArScene, Camera, Ray};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::emulator::EmulatedRig;
use crate::input;
use crate::loader;

// The emulated device has a single controller.
const EMULATED_CONTROLLER: usize = 0;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<ArScene>>,
    pub rig: Rc<RefCell<EmulatedRig>>,
    pub camera: Rc<RefCell<Camera>>,
}

impl InputWiring {
    /// Camera ray through the pointer; also re-aims the emulated controller.
    fn aim(&self, ev: &web::PointerEvent) -> Ray {
        let pos = input::pointer_canvas_css(ev, &self.canvas);
        let size = input::canvas_css_size(&self.canvas);
        let ray = self.camera.borrow().screen_ray(pos.x, pos.y, size.x, size.y);
        let pose = {
            let mut rig = self.rig.borrow_mut();
            rig.aim(&ray);
            rig.controller_pose()
        };
        self.scene
            .borrow_mut()
            .set_controller_pose(EMULATED_CONTROLLER, pose);
        ray
    }
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w.aim(&ev);
    }) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ray = w.aim(&ev);
        w.rig.borrow_mut().pointer_down = true;
        w.scene
            .borrow_mut()
            .on_select_start(EMULATED_CONTROLLER, &ray);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

// A completed press is a select followed by the end of the gesture.
fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ray = w.aim(&ev);
        if !std::mem::take(&mut w.rig.borrow_mut().pointer_down) {
            return;
        }
        let requests = w
            .scene
            .borrow_mut()
            .on_press_end(EMULATED_CONTROLLER, &ray);
        loader::spawn_loads(&w.scene, requests);
    }) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    closure.forget();
}
