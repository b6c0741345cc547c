use std::cell::RefCell;
use std::rc::Rc;

use ar_core::{ArScene, Camera, HitTestTracker};
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{DEBUG_REFRESH_FRAMES, EMULATED_CLEAR_COLOR};
use crate::emulator::{self, EmulatedRig, FloorHitSource};
use crate::input;
use crate::overlay;
use crate::render::Renderer;

/// Per-frame state for the emulated device, driven by the window's
/// animation frame callback.
pub struct FrameContext {
    pub scene: Rc<RefCell<ArScene>>,
    pub rig: Rc<RefCell<EmulatedRig>>,
    pub camera: Rc<RefCell<Camera>>,
    pub tracker: HitTestTracker<FloorHitSource>,
    pub renderer: Renderer,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub started: Instant,
    pub frame_count: u32,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();

        // The emulated source is synchronous: a request resolves on the frame it is made.
        if let Some(ticket) = self.tracker.poll_request() {
            _ = self.tracker.resolve(ticket, FloorHitSource::default());
            log::info!("[emu] hit-test source ready");
        }

        let (head, controller) = {
            let rig = self.rig.borrow();
            rig.apply_to(&mut self.camera.borrow_mut());
            (rig.headset_pose(), rig.controller_pose())
        };

        {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            let reticle = scene.reticle();
            self.tracker
                .update_reticle(&mut scene.graph, &reticle, |src| src.hits(head));
            scene.set_controller_pose(0, controller);
            scene.tick(elapsed);
        }

        let scene = self.scene.borrow();
        let camera = self.camera.borrow();
        let viewport = [0, 0, self.canvas.width() as i32, self.canvas.height() as i32];
        self.renderer.begin(None, EMULATED_CLEAR_COLOR);
        self.renderer
            .draw_view(&scene, camera.view_projection(), viewport, true);

        let css = input::canvas_css_size(&self.canvas);
        let rect = self.canvas.get_bounding_client_rect();
        let (left, top) = (rect.left() as f32, rect.top() as f32);
        overlay::sync_panels(&self.document, &scene.visible_panels(), |world| {
            camera
                .project(world, css.x, css.y)
                .map(|[x, y]| [x + left, y + top])
        });

        if self.frame_count % DEBUG_REFRESH_FRAMES == 0 {
            let text = emulator::status_text(&scene, &self.rig.borrow(), 0);
            overlay::set_debug_text(&self.document, &text);
        }
        self.frame_count = self.frame_count.wrapping_add(1);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
