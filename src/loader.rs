use std::cell::RefCell;
use std::rc::Rc;

use ar_core::{decode_gltf, ArError, ArResult, ArScene, LoadRequest, ModelAsset};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

async fn fetch_bytes(path: &str) -> Result<Vec<u8>, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let opts = web::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web::RequestMode::SameOrigin);
    let request = web::Request::new_with_str_and_init(path, &opts)?;
    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetch and decode one model asset.
pub async fn load_model(path: &str) -> ArResult<ModelAsset> {
    let bytes = fetch_bytes(path).await.map_err(|e| ArError::Fetch {
        path: path.to_string(),
        reason: format!("{:?}", e),
    })?;
    log::info!("[spawn] fetched {} ({} bytes)", path, bytes.len());
    decode_gltf(path, &bytes)
}

/// Run each request in the background and hand the result back to the scene.
pub fn spawn_loads(scene: &Rc<RefCell<ArScene>>, requests: Vec<LoadRequest>) {
    for request in requests {
        let scene = scene.clone();
        spawn_local(async move {
            let result = load_model(request.path).await;
            scene.borrow_mut().finish_load(&request, result);
        });
    }
}
