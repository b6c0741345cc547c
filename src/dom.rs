use std::cell::RefCell;
use std::rc::Rc;

use ar_core::Camera;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Look up `id`, creating a `tag` element under `<body>` when the page lacks it.
pub fn ensure_element(
    document: &web::Document,
    id: &str,
    tag: &str,
    style: &str,
) -> Option<web::Element> {
    if let Some(el) = document.get_element_by_id(id) {
        return Some(el);
    }
    let el = document.create_element(tag).ok()?;
    el.set_id(id);
    _ = el.set_attribute("style", style);
    let body = document.body()?;
    _ = body.append_child(&el);
    Some(el)
}

/// Keep the canvas backing store at CSS size times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let width = ((rect.width() * dpr).round() as u32).max(1);
    let height = ((rect.height() * dpr).round() as u32).max(1);
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
    (width, height)
}

/// Track window resizes: backing size and camera aspect.
pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, camera: Rc<RefCell<Camera>>) {
    let (w, h) = sync_canvas_backing_size(canvas);
    camera.borrow_mut().set_viewport(w, h);
    let canvas_resize = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        let (w, h) = sync_canvas_backing_size(&canvas_resize);
        camera.borrow_mut().set_viewport(w, h);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
