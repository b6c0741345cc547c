#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use ar_core::{ArScene, Camera};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod bootstrap;
mod constants;
mod dom;
mod emulator;
mod events;
mod frame;
mod input;
mod loader;
mod native;
mod overlay;
mod render;
mod shading;
mod xr;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ar-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let search = window.location().search().unwrap_or_default();
    let variant = input::parse_scene_variant(&search);
    let scene = Rc::new(RefCell::new(ArScene::new(variant, StdRng::from_entropy())));

    // Backing size and camera aspect follow the window.
    let camera = Rc::new(RefCell::new(Camera::default()));
    dom::wire_canvas_resize(&canvas, camera.clone());

    let renderer = render::Renderer::new(render::create_context(&canvas)?)?;
    let device = bootstrap::detect(&window).await;
    bootstrap::Bootstrap {
        scene,
        camera,
        renderer,
        canvas,
        document,
    }
    .start(device)
}
