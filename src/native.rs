//! Native `immersive-ar` session driver.
//!
//! Owns the "Enter AR" button and, once a session is running, the XR frame
//! loop: hit-test source lifecycle, controller poses, select events and
//! per-view rendering into the session's WebGL layer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ar_core::{project_point, ArScene, ControllerId, ControllerSlots, HitTestTracker, Ray};
use instant::Instant;
use js_sys::{Array, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::constants::{
    HIT_TEST_SPACE, OPTIONAL_FEATURES, PASSTHROUGH_CLEAR_COLOR, POSE_SPACE, REQUIRED_FEATURES,
    SESSION_MODE,
};
use crate::loader;
use crate::overlay;
use crate::render::Renderer;
use crate::xr::{
    self, XrFrame, XrHitTestResult, XrHitTestSource, XrInputSource, XrInputSourceEvent,
    XrReferenceSpace, XrSession, XrSystem, XrView, XrWebGlLayer,
};

type FrameCallback = Closure<dyn FnMut(f64, XrFrame)>;

/// State that outlives individual sessions.
pub struct NativeDriver {
    xr: XrSystem,
    scene: Rc<RefCell<ArScene>>,
    renderer: Renderer,
    tracker: Rc<RefCell<HitTestTracker<XrHitTestSource>>>,
    controllers: RefCell<ControllerSlots<XrInputSource>>,
    document: web::Document,
    button: web::Element,
    busy: Cell<bool>,
    started: Instant,
}

/// One running session.
struct ActiveSession {
    session: XrSession,
    layer: XrWebGlLayer,
    pose_space: XrReferenceSpace,
    viewer_space: XrReferenceSpace,
    frame_loop: RefCell<Option<FrameCallback>>,
}

/// Show the "Enter AR" button; each click starts a session.
pub fn install(
    xr: XrSystem,
    scene: Rc<RefCell<ArScene>>,
    renderer: Renderer,
    document: web::Document,
) -> anyhow::Result<()> {
    let button = overlay::ar_button(&document)
        .ok_or_else(|| anyhow::anyhow!("cannot create #{}", crate::constants::AR_BUTTON_ID))?;
    let driver = Rc::new(NativeDriver {
        xr,
        scene,
        renderer,
        tracker: Rc::new(RefCell::new(HitTestTracker::new())),
        controllers: RefCell::new(ControllerSlots::new()),
        document,
        button: button.clone(),
        busy: Cell::new(false),
        started: Instant::now(),
    });

    let closure = Closure::wrap(Box::new(move || {
        if driver.busy.replace(true) {
            return;
        }
        let driver = driver.clone();
        spawn_local(async move {
            if let Err(e) = start_session(driver.clone()).await {
                log::error!("[xr] session start failed: {:?}", e);
                driver.busy.set(false);
                overlay::show(&driver.button);
            }
        });
    }) as Box<dyn FnMut()>);
    _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();

    overlay::show(&button);
    log::info!("[xr] {} supported, waiting for user", SESSION_MODE);
    Ok(())
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn session_init(document: &web::Document) -> Result<js_sys::Object, JsValue> {
    let init = xr::js_object(&[
        ("requiredFeatures", xr::string_array(REQUIRED_FEATURES).into()),
        ("optionalFeatures", xr::string_array(OPTIONAL_FEATURES).into()),
    ])?;
    if let Some(root) = overlay::panel_layer(document) {
        let dom_overlay = xr::js_object(&[("root", JsValue::from(root))])?;
        Reflect::set(&init, &JsValue::from_str("domOverlay"), &dom_overlay)?;
    }
    Ok(init)
}

async fn request_space(session: &XrSession, kind: &str) -> anyhow::Result<XrReferenceSpace> {
    let space = JsFuture::from(session.request_reference_space(kind))
        .await
        .map_err(js_err)?;
    Ok(space.unchecked_into())
}

async fn start_session(driver: Rc<NativeDriver>) -> anyhow::Result<()> {
    let init = session_init(&driver.document).map_err(js_err)?;
    let session: XrSession = JsFuture::from(driver.xr.request_session(SESSION_MODE, &init))
        .await
        .map_err(js_err)?
        .unchecked_into();

    let layer = XrWebGlLayer::new(&session, driver.renderer.gl()).map_err(js_err)?;
    let render_state =
        xr::js_object(&[("baseLayer", JsValue::from(layer.clone()))]).map_err(js_err)?;
    session.update_render_state(&render_state);

    let pose_space = request_space(&session, POSE_SPACE).await?;
    let viewer_space = request_space(&session, HIT_TEST_SPACE).await?;

    let active = Rc::new(ActiveSession {
        session,
        layer,
        pose_space,
        viewer_space,
        frame_loop: RefCell::new(None),
    });
    overlay::hide(&driver.button);
    wire_session_events(&driver, &active);
    run_frame_loop(driver, active);
    log::info!("[xr] session started");
    Ok(())
}

fn controller_index(driver: &NativeDriver, source: &XrInputSource) -> ControllerId {
    driver.controllers.borrow_mut().id_for(source.clone())
}

/// Controller index and target ray of an input event, updating the
/// controller node's pose on the way.
fn event_ray(
    driver: &NativeDriver,
    active: &ActiveSession,
    ev: &XrInputSourceEvent,
) -> Option<(ControllerId, Ray)> {
    let source = ev.input_source();
    let index = controller_index(driver, &source);
    let pose = ev
        .frame()
        .get_pose(&source.target_ray_space(), &active.pose_space)?;
    let matrix = xr::pose_matrix(&pose);
    driver.scene.borrow_mut().set_controller_pose(index, matrix);
    Some((index, Ray::from_pose(matrix)))
}

fn add_session_listener(
    session: &XrSession,
    name: &str,
    mut f: impl FnMut(XrInputSourceEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        f(ev.unchecked_into());
    }) as Box<dyn FnMut(_)>);
    _ = session.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_session_events(driver: &Rc<NativeDriver>, active: &Rc<ActiveSession>) {
    let (d, a) = (driver.clone(), active.clone());
    add_session_listener(&active.session, "select", move |ev| {
        let Some((index, ray)) = event_ray(&d, &a, &ev) else {
            return;
        };
        let requests = d.scene.borrow_mut().on_select(index, &ray);
        loader::spawn_loads(&d.scene, requests);
    });

    let (d, a) = (driver.clone(), active.clone());
    add_session_listener(&active.session, "selectstart", move |ev| {
        if let Some((index, ray)) = event_ray(&d, &a, &ev) {
            d.scene.borrow_mut().on_select_start(index, &ray);
        }
    });

    let d = driver.clone();
    add_session_listener(&active.session, "selectend", move |ev| {
        let index = controller_index(&d, &ev.input_source());
        d.scene.borrow_mut().on_select_end(index);
    });

    let (d, a) = (driver.clone(), active.clone());
    // XRSessionEvent carries nothing needed here.
    add_session_listener(&active.session, "end", move |_| {
        end_session(&d, &a);
    });
}

fn end_session(driver: &NativeDriver, active: &ActiveSession) {
    active.frame_loop.borrow_mut().take();
    if let Some(source) = driver.tracker.borrow_mut().session_ended() {
        source.cancel();
    }
    {
        let mut scene = driver.scene.borrow_mut();
        for index in driver.controllers.borrow_mut().clear() {
            scene.on_select_end(index);
        }
    }
    overlay::sync_panels(&driver.document, &[], |_| None);
    overlay::show(&driver.button);
    driver.busy.set(false);
    log::info!("[xr] session ended");
}

fn run_frame_loop(driver: Rc<NativeDriver>, active: Rc<ActiveSession>) {
    let session = active.session.clone();
    let looped = active.clone();
    let closure: FrameCallback = Closure::wrap(Box::new(move |_time: f64, frame: XrFrame| {
        driver.on_frame(&looped, &frame);
        if let Some(cb) = looped.frame_loop.borrow().as_ref() {
            looped
                .session
                .request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64, XrFrame)>);
    session.request_animation_frame(closure.as_ref().unchecked_ref());
    *active.frame_loop.borrow_mut() = Some(closure);
}

impl NativeDriver {
    fn request_hit_test_source(&self, active: &ActiveSession) {
        let Some(ticket) = self.tracker.borrow_mut().poll_request() else {
            return;
        };
        let space = JsValue::from(active.viewer_space.clone());
        let options = match xr::js_object(&[("space", space)]) {
            Ok(o) => o,
            Err(e) => {
                log::warn!("[xr] hit-test options: {:?}", e);
                self.tracker.borrow_mut().reject(ticket);
                return;
            }
        };
        let promise = active.session.request_hit_test_source(&options);
        let tracker = self.tracker.clone();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(value) => {
                    let source: XrHitTestSource = value.unchecked_into();
                    // A late answer for an ended session is released straight away.
                    let stale = tracker.borrow_mut().resolve(ticket, source).err();
                    match stale {
                        None => log::info!("[xr] hit-test source ready"),
                        Some(source) => source.cancel(),
                    }
                }
                Err(e) => {
                    log::warn!("[xr] hit-test source unavailable: {:?}", e);
                    tracker.borrow_mut().reject(ticket);
                }
            }
        });
    }

    fn on_frame(&self, active: &ActiveSession, frame: &XrFrame) {
        self.request_hit_test_source(active);
        let elapsed = self.started.elapsed().as_secs_f64();

        {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            let reticle = scene.reticle();
            self.tracker
                .borrow()
                .update_reticle(&mut scene.graph, &reticle, |source| {
                    frame
                        .get_hit_test_results(source)
                        .iter()
                        .filter_map(|r| {
                            r.unchecked_into::<XrHitTestResult>()
                                .pose_in(&active.pose_space)
                        })
                        .map(|p| xr::pose_matrix(&p))
                        .collect()
                });

            let sources: Vec<XrInputSource> = Array::from(&active.session.input_sources())
                .iter()
                .map(|s| s.unchecked_into())
                .collect();
            // A disconnected source drops whatever it was holding.
            let gone = self.controllers.borrow_mut().retain(|h| sources.contains(h));
            for index in gone {
                log::info!("[xr] input source {} disconnected", index);
                scene.on_select_end(index);
            }
            for source in &sources {
                let index = controller_index(self, source);
                let space = source.target_ray_space();
                if let Some(pose) = frame.get_pose(&space, &active.pose_space) {
                    scene.set_controller_pose(index, xr::pose_matrix(&pose));
                }
            }
            scene.tick(elapsed);
        }

        let Some(viewer) = frame.get_viewer_pose(&active.pose_space) else {
            return;
        };
        let scene = self.scene.borrow();
        self.renderer
            .begin(active.layer.framebuffer().as_ref(), PASSTHROUGH_CLEAR_COLOR);
        for (i, view) in viewer.views().iter().enumerate() {
            let view: XrView = view.unchecked_into();
            let Some(vp) = active.layer.get_viewport(&view) else {
                continue;
            };
            let view_proj = xr::view_projection(&view);
            self.renderer.draw_view(
                &scene,
                view_proj,
                [vp.x(), vp.y(), vp.width(), vp.height()],
                false,
            );
            // Panels follow the first view; the overlay root covers the screen.
            if i == 0 {
                let (w, h) = screen_css_size();
                overlay::sync_panels(&self.document, &scene.visible_panels(), |world| {
                    project_point(view_proj, world, w, h)
                });
            }
        }
    }
}

fn screen_css_size() -> (f32, f32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32;
    match web::window() {
        Some(w) => (dim(w.inner_width()), dim(w.inner_height())),
        None => (1.0, 1.0),
    }
}
