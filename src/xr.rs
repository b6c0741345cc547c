//! Minimal WebXR bindings.
//!
//! Only the surface this app touches is imported. Hit testing is not exposed
//! by stable `web-sys`, so the whole session API is declared here instead of
//! mixing stable and unstable bindings.

use glam::Mat4;
use js_sys::{Array, Float32Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, WebGl2RenderingContext, WebGlFramebuffer};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = EventTarget, extends = Object, js_name = XRSystem)]
    #[derive(Debug, Clone)]
    pub type XrSystem;

    #[wasm_bindgen(method, js_name = isSessionSupported)]
    pub fn is_session_supported(this: &XrSystem, mode: &str) -> Promise;

    #[wasm_bindgen(method, js_name = requestSession)]
    pub fn request_session(this: &XrSystem, mode: &str, init: &JsValue) -> Promise;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = EventTarget, extends = Object, js_name = XRSession)]
    #[derive(Debug, Clone)]
    pub type XrSession;

    #[wasm_bindgen(method, js_name = requestReferenceSpace)]
    pub fn request_reference_space(this: &XrSession, kind: &str) -> Promise;

    #[wasm_bindgen(method, js_name = requestHitTestSource)]
    pub fn request_hit_test_source(this: &XrSession, options: &JsValue) -> Promise;

    #[wasm_bindgen(method, js_name = requestAnimationFrame)]
    pub fn request_animation_frame(this: &XrSession, callback: &Function) -> u32;

    #[wasm_bindgen(method, js_name = updateRenderState)]
    pub fn update_render_state(this: &XrSession, state: &JsValue);

    #[wasm_bindgen(method, getter, js_name = inputSources)]
    pub fn input_sources(this: &XrSession) -> JsValue;

    #[wasm_bindgen(method)]
    pub fn end(this: &XrSession) -> Promise;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = EventTarget, extends = Object, js_name = XRSpace)]
    #[derive(Debug, Clone)]
    pub type XrSpace;

    #[wasm_bindgen(
        extends = XrSpace,
        extends = EventTarget,
        extends = Object,
        js_name = XRReferenceSpace
    )]
    #[derive(Debug, Clone)]
    pub type XrReferenceSpace;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = XRFrame)]
    #[derive(Debug, Clone)]
    pub type XrFrame;

    #[wasm_bindgen(method, js_name = getViewerPose)]
    pub fn get_viewer_pose(this: &XrFrame, space: &XrReferenceSpace) -> Option<XrViewerPose>;

    #[wasm_bindgen(method, js_name = getPose)]
    pub fn get_pose(this: &XrFrame, space: &XrSpace, base: &XrSpace) -> Option<XrPose>;

    #[wasm_bindgen(method, js_name = getHitTestResults)]
    pub fn get_hit_test_results(this: &XrFrame, source: &XrHitTestSource) -> Array;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = XRHitTestSource)]
    #[derive(Debug, Clone)]
    pub type XrHitTestSource;

    #[wasm_bindgen(method)]
    pub fn cancel(this: &XrHitTestSource);

    #[wasm_bindgen(extends = Object, js_name = XRHitTestResult)]
    #[derive(Debug, Clone)]
    pub type XrHitTestResult;

    #[wasm_bindgen(method, js_name = getPose)]
    pub fn pose_in(this: &XrHitTestResult, base: &XrSpace) -> Option<XrPose>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = XRPose)]
    #[derive(Debug, Clone)]
    pub type XrPose;

    #[wasm_bindgen(method, getter)]
    pub fn transform(this: &XrPose) -> XrRigidTransform;

    #[wasm_bindgen(extends = XrPose, extends = Object, js_name = XRViewerPose)]
    #[derive(Debug, Clone)]
    pub type XrViewerPose;

    #[wasm_bindgen(method, getter)]
    pub fn views(this: &XrViewerPose) -> Array;

    #[wasm_bindgen(extends = Object, js_name = XRRigidTransform)]
    #[derive(Debug, Clone)]
    pub type XrRigidTransform;

    #[wasm_bindgen(method, getter)]
    pub fn matrix(this: &XrRigidTransform) -> Float32Array;

    #[wasm_bindgen(method, getter)]
    pub fn inverse(this: &XrRigidTransform) -> XrRigidTransform;

    #[wasm_bindgen(extends = Object, js_name = XRView)]
    #[derive(Debug, Clone)]
    pub type XrView;

    #[wasm_bindgen(method, getter, js_name = projectionMatrix)]
    pub fn projection_matrix(this: &XrView) -> Float32Array;

    #[wasm_bindgen(method, getter, js_name = transform)]
    pub fn view_transform(this: &XrView) -> XrRigidTransform;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = XRWebGLLayer)]
    #[derive(Debug, Clone)]
    pub type XrWebGlLayer;

    #[wasm_bindgen(constructor, js_class = "XRWebGLLayer", catch)]
    pub fn new(session: &XrSession, gl: &WebGl2RenderingContext) -> Result<XrWebGlLayer, JsValue>;

    #[wasm_bindgen(method, getter)]
    pub fn framebuffer(this: &XrWebGlLayer) -> Option<WebGlFramebuffer>;

    #[wasm_bindgen(method, js_name = getViewport)]
    pub fn get_viewport(this: &XrWebGlLayer, view: &XrView) -> Option<XrViewport>;

    #[wasm_bindgen(extends = Object, js_name = XRViewport)]
    #[derive(Debug, Clone)]
    pub type XrViewport;

    #[wasm_bindgen(method, getter)]
    pub fn x(this: &XrViewport) -> i32;

    #[wasm_bindgen(method, getter)]
    pub fn y(this: &XrViewport) -> i32;

    #[wasm_bindgen(method, getter)]
    pub fn width(this: &XrViewport) -> i32;

    #[wasm_bindgen(method, getter)]
    pub fn height(this: &XrViewport) -> i32;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = XRInputSource)]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub type XrInputSource;

    #[wasm_bindgen(method, getter, js_name = targetRaySpace)]
    pub fn target_ray_space(this: &XrInputSource) -> XrSpace;

    #[wasm_bindgen(extends = Event, extends = Object, js_name = XRInputSourceEvent)]
    #[derive(Debug, Clone)]
    pub type XrInputSourceEvent;

    #[wasm_bindgen(method, getter)]
    pub fn frame(this: &XrInputSourceEvent) -> XrFrame;

    #[wasm_bindgen(method, getter, js_name = inputSource)]
    pub fn input_source(this: &XrInputSourceEvent) -> XrInputSource;
}

/// `navigator.xr`, when the browser exposes it.
pub fn xr_system(window: &web_sys::Window) -> Option<XrSystem> {
    let value = Reflect::get(&window.navigator(), &JsValue::from_str("xr")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(value.unchecked_into())
}

pub fn rigid_matrix(transform: &XrRigidTransform) -> Mat4 {
    let mut cols = [0.0f32; 16];
    transform.matrix().copy_to(&mut cols);
    Mat4::from_cols_array(&cols)
}

pub fn pose_matrix(pose: &XrPose) -> Mat4 {
    rigid_matrix(&pose.transform())
}

pub fn view_projection(view: &XrView) -> Mat4 {
    let mut cols = [0.0f32; 16];
    view.projection_matrix().copy_to(&mut cols);
    Mat4::from_cols_array(&cols) * rigid_matrix(&view.view_transform().inverse())
}

/// Plain JS object from string keys, for session/render-state dictionaries.
pub fn js_object(entries: &[(&str, JsValue)]) -> Result<Object, JsValue> {
    let obj = Object::new();
    for (key, value) in entries {
        Reflect::set(&obj, &JsValue::from_str(key), value)?;
    }
    Ok(obj)
}

pub fn string_array(items: &[&str]) -> Array {
    items.iter().map(|s| JsValue::from_str(s)).collect()
}
