use ar_core::PanelView;
use web_sys as web;

use crate::constants::{ACTIVE_PANEL_ID, AR_BUTTON_ID, DEBUG_PANEL_ID, PANEL_LAYER_ID};
use crate::dom;

const LAYER_STYLE: &str = "position:fixed;inset:0;pointer-events:none;overflow:hidden;";
const PANEL_STYLE: &str = "position:absolute;transform:translate(-50%,-100%);padding:6px 10px;\
     border-radius:6px;background:rgba(10,14,24,0.82);color:#e6f0ff;font:13px system-ui;\
     border:1px solid rgba(120,150,200,0.4);white-space:nowrap;display:none;";
const DEBUG_STYLE: &str = "position:fixed;left:8px;bottom:8px;padding:6px 10px;border-radius:6px;\
     background:rgba(10,14,24,0.75);color:#cfe7ff;font:12px ui-monospace,monospace;\
     white-space:pre;pointer-events:none;";
const BUTTON_STYLE: &str = "position:fixed;left:50%;bottom:24px;transform:translateX(-50%);\
     padding:12px 24px;border-radius:8px;border:1px solid #fff;background:rgba(0,0,0,0.6);\
     color:#fff;font:14px system-ui;cursor:pointer;";

/// Root element for floating panels. Also serves as the `dom-overlay` root.
pub fn panel_layer(document: &web::Document) -> Option<web::Element> {
    dom::ensure_element(document, PANEL_LAYER_ID, "div", LAYER_STYLE)
}

fn active_panel(document: &web::Document) -> Option<web::HtmlElement> {
    use wasm_bindgen::JsCast;
    if let Some(el) = document.get_element_by_id(ACTIVE_PANEL_ID) {
        return el.dyn_into().ok();
    }
    let layer = panel_layer(document)?;
    let el = document.create_element("div").ok()?;
    el.set_id(ACTIVE_PANEL_ID);
    _ = el.set_attribute("style", PANEL_STYLE);
    _ = layer.append_child(&el);
    el.dyn_into().ok()
}

/// Mirror the scene's visible panel into the page. `project` maps a world
/// point to CSS pixels, or `None` when it is off-screen.
pub fn sync_panels(
    document: &web::Document,
    panels: &[PanelView],
    project: impl Fn(glam::Vec3) -> Option<[f32; 2]>,
) {
    let Some(el) = active_panel(document) else {
        return;
    };
    let style = el.style();
    match panels.first().and_then(|p| project(p.world).map(|xy| (p, xy))) {
        Some((panel, [x, y])) => {
            if el.text_content().as_deref() != Some(panel.text.as_str()) {
                el.set_text_content(Some(&panel.text));
            }
            _ = style.set_property("left", &format!("{x:.1}px"));
            _ = style.set_property("top", &format!("{y:.1}px"));
            _ = style.set_property("display", "block");
        }
        None => {
            _ = style.set_property("display", "none");
        }
    }
}

pub fn set_debug_text(document: &web::Document, text: &str) {
    if let Some(el) = dom::ensure_element(document, DEBUG_PANEL_ID, "div", DEBUG_STYLE) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

#[inline]
pub fn show(el: &web::Element) {
    _ = el.class_list().remove_1("hidden");
    if let Some(style) = el.get_attribute("style") {
        _ = el.set_attribute("style", &style.replace("display:none;", ""));
    }
}

#[inline]
pub fn hide(el: &web::Element) {
    _ = el.class_list().add_1("hidden");
    let style = el.get_attribute("style").unwrap_or_default();
    if !style.contains("display:none;") {
        _ = el.set_attribute("style", &format!("display:none;{style}"));
    }
}

#[inline]
pub fn is_hidden(el: &web::Element) -> bool {
    el.class_list().contains("hidden")
        || el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false)
}

#[inline]
pub fn toggle(el: &web::Element) {
    if is_hidden(el) {
        show(el);
    } else {
        hide(el);
    }
}

pub fn toggle_debug(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_PANEL_ID) {
        toggle(&el);
    }
}

/// The "Enter AR" button, created hidden if the page does not provide one.
pub fn ar_button(document: &web::Document) -> Option<web::Element> {
    let el = dom::ensure_element(
        document,
        AR_BUTTON_ID,
        "button",
        &format!("display:none;{BUTTON_STYLE}"),
    )?;
    if el.text_content().map(|t| t.is_empty()).unwrap_or(true) {
        el.set_text_content(Some("Enter AR"));
    }
    Some(el)
}
