use ar_core::SceneVariant;
use glam::Vec2;
use web_sys as web;

use crate::constants::SCENE_QUERY_KEY;

/// Scene variant from a `location.search` string such as `?scene=coins`.
/// Missing or unknown values fall back to the inspect scene.
pub fn parse_scene_variant(search: &str) -> SceneVariant {
    let query = search.trim_start_matches('?');
    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or_default();
        if key != SCENE_QUERY_KEY {
            continue;
        }
        return match kv.next().map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("coins") | Some("2") => SceneVariant::Coins,
            _ => SceneVariant::Inspect,
        };
    }
    SceneVariant::Inspect
}

/// Pointer position in canvas CSS pixels.
#[inline]
pub fn pointer_canvas_css(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

/// Canvas size in CSS pixels, never zero.
#[inline]
pub fn canvas_css_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(rect.width().max(1.0) as f32, rect.height().max(1.0) as f32)
}
