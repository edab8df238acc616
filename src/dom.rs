use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn location_path() -> String {
    web::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// CSS width of the viewport in pixels.
#[inline]
pub fn viewport_width() -> f64 {
    web::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(1024.0)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Look up `id`, creating a `tag` element under `<body>` when missing.
pub fn ensure_element(
    document: &web::Document,
    tag: &str,
    id: &str,
    class: &str,
) -> anyhow::Result<web::Element> {
    if let Some(el) = document.get_element_by_id(id) {
        return Ok(el);
    }
    let el = document
        .create_element(tag)
        .map_err(|e| anyhow::anyhow!("create_element {tag}: {:?}", e))?;
    el.set_id(id);
    if !class.is_empty() {
        el.set_class_name(class);
    }
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&el)
        .map_err(|e| anyhow::anyhow!("append {id}: {:?}", e))?;
    Ok(el)
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}
