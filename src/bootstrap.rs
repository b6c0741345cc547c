//! Picks the device backing the scene: a native `immersive-ar` session when
//! the browser offers one, otherwise the emulated headset on the page canvas.

use std::cell::RefCell;
use std::rc::Rc;

use ar_core::{ArScene, Camera, HitTestTracker};
use instant::Instant;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::constants::SESSION_MODE;
use crate::emulator::EmulatedRig;
use crate::events;
use crate::frame::{self, FrameContext};
use crate::native;
use crate::render::Renderer;
use crate::xr::{self, XrSystem};

pub enum Device {
    Native(XrSystem),
    Emulated,
}

/// Resolve which device to drive. Any failure while probing means emulation.
pub async fn detect(window: &web::Window) -> Device {
    let Some(system) = xr::xr_system(window) else {
        log::info!("[xr] navigator.xr missing, emulating");
        return Device::Emulated;
    };
    match JsFuture::from(system.is_session_supported(SESSION_MODE)).await {
        Ok(v) if v.as_bool().unwrap_or(false) => Device::Native(system),
        Ok(_) => {
            log::info!("[xr] {} not supported, emulating", SESSION_MODE);
            Device::Emulated
        }
        Err(e) => {
            log::warn!("[xr] support check failed: {:?}", e);
            Device::Emulated
        }
    }
}

pub struct Bootstrap {
    pub scene: Rc<RefCell<ArScene>>,
    pub camera: Rc<RefCell<Camera>>,
    pub renderer: Renderer,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
}

impl Bootstrap {
    pub fn start(self, device: Device) -> anyhow::Result<()> {
        match device {
            Device::Native(system) => {
                native::install(system, self.scene, self.renderer, self.document)
            }
            Device::Emulated => {
                self.start_emulated();
                Ok(())
            }
        }
    }

    fn start_emulated(self) {
        let rig = Rc::new(RefCell::new(EmulatedRig::default()));
        events::wire_emulator_keys(rig.clone());
        events::wire_input_handlers(events::InputWiring {
            canvas: self.canvas.clone(),
            scene: self.scene.clone(),
            rig: rig.clone(),
            camera: self.camera.clone(),
        });
        let frame_ctx = Rc::new(RefCell::new(FrameContext {
            scene: self.scene,
            rig,
            camera: self.camera,
            tracker: HitTestTracker::new(),
            renderer: self.renderer,
            canvas: self.canvas,
            document: self.document,
            started: Instant::now(),
            frame_count: 0,
        }));
        frame::start_loop(frame_ctx);
        log::info!("[emu] emulated device running");
    }
}
